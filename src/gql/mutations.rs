use super::{id_list, RemoteId};

/// Asks the server to fetch (if needed) and list a chapter's page paths.
pub fn chapter_pages_mutation(chapter: RemoteId) -> String {
    format!(
        r#"
mutation GetChapterPages {{
  fetchChapterPages(input: {{chapterId: {chapter}}}) {{
    pages
  }}
}}
"#
    )
}

/// Sets the read flag on every chapter in `ids` in one request.
pub fn set_chapters_read_mutation(ids: &[RemoteId], read: bool) -> String {
    format!(
        r#"
mutation UpdateChapters {{
  updateChapters(input: {{ids: [{ids}], patch: {{isRead: {read}}}}}) {{
    chapters {{
      id
      isRead
    }}
  }}
}}
"#,
        ids = id_list(ids)
    )
}
