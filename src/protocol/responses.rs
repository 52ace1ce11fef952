//! HTTP response bodies
//!
//! HTML fragments returned by the routes. Pages shown after an action carry a
//! refresh tag sending the browser back to the file listing.

/// Refresh after a successful action
pub const REFRESH_SUCCESS: &str = r#"<meta http-equiv="refresh" content="3;url=/files">"#;

/// Refresh after a failed action
pub const REFRESH_FAILURE: &str = r#"<meta http-equiv="refresh" content="5;url=/files">"#;

/// Where the listing view lives (served by the front-end server)
pub const FILES_URL: &str = "/files";

pub const DONE: &str = "done";

pub fn success_page(body: &str) -> String {
    format!("{REFRESH_SUCCESS}{body}")
}

pub fn failure_page(body: &str) -> String {
    format!("{REFRESH_FAILURE}{body}")
}

/// Entries of a list, one per line
pub fn list_page(items: &[String]) -> String {
    items
        .iter()
        .map(|item| escape_html(item))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Upload form listing the folder choices by index
pub fn index_page(folders: &[String]) -> String {
    let options: String = folders
        .iter()
        .enumerate()
        .map(|(i, folder)| format!("<option value=\"{}\">{}</option>", i, escape_html(folder)))
        .collect();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>RAX Cloud</title>
</head>
<body>
  <h1>RAX Cloud</h1>
  <p><a href="{FILES_URL}">Files</a></p>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <label for="folder">Destination folder</label>
    <select id="folder" name="folder">{options}</select>
    <input type="file" name="files" multiple>
    <input type="submit" name="submit" value="Upload">
  </form>
</body>
</html>
"#
    )
}

/// Escapes text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
