use super::{string_literal, RemoteId};

/// Every category with its manga; the first category is the library.
pub const ALL_CATEGORIES_QUERY: &str = r#"
query AllCategories {
  categories {
    nodes {
      mangas {
        nodes {
          id
          title
          thumbnailUrl
        }
      }
    }
  }
}
"#;

/// Library manga whose title contains `title`, case-insensitively.
pub fn search_manga_query(title: &str) -> String {
    format!(
        r#"
query SearchManga {{
  mangas(filter: {{title: {{includesInsensitive: {title}}}, inLibrary: {{equalTo: true}}}}) {{
    nodes {{
      id
      title
      thumbnailUrl
    }}
  }}
}}
"#,
        title = string_literal(title)
    )
}

pub fn manga_query(id: RemoteId) -> String {
    format!(
        r#"
query GetManga {{
  manga(id: {id}) {{
    id
    title
    thumbnailUrl
    description
    author
    status
    genre
    source {{
      lang
      displayName
    }}
    highestNumberedChapter {{
      chapterNumber
    }}
    latestReadChapter {{
      chapterNumber
    }}
  }}
}}
"#
    )
}

pub fn manga_chapters_query(id: RemoteId) -> String {
    format!(
        r#"
query GetMangaChapters {{
  manga(id: {id}) {{
    id
    source {{
      lang
    }}
    chapters {{
      nodes {{
        id
        name
        chapterNumber
        uploadDate
        scanlator
        isRead
        lastPageRead
        lastReadAt
        pageCount
      }}
    }}
  }}
}}
"#
    )
}
