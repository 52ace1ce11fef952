//! Route handlers for the RAX Cloud server.
//!
//! Each handler turns one request into at most one filesystem or list change,
//! records the outcome in the audit log and renders a small HTML response.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::info;
use serde::Deserialize;
use std::sync::Arc;

use crate::client::Client;
use crate::error::{CloudServerError, ListError, RequestError, StorageError};
use crate::lists::JsonList;
use crate::protocol::responses::{
    DONE, FILES_URL, escape_html, failure_page, index_page, list_page, success_page,
};
use crate::server::state::{AppState, run_blocking, with_list};
use crate::storage::{
    DeletedKind, UploadedFile, delete_entry, make_directory, move_entry, sanitize_filename,
    store_files,
};

/// Renders the upload form with the folders visible to the caller.
pub async fn index(
    State(state): State<AppState>,
    client: Client,
) -> Result<Html<String>, CloudServerError> {
    let folders = state.list_folders(client.identity()).await?;

    state
        .record(&client, &format!("User {} opened index", client.identity()))
        .await;
    Ok(Html(index_page(&folders)))
}

/// Raw multipart fields of an upload
#[derive(Debug, Default)]
struct UploadForm {
    folder: Option<String>,
    files: Vec<(String, Vec<u8>)>,
}

async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, CloudServerError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("folder") => form.folder = Some(field.text().await?),
            Some("files") => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let data = field.bytes().await?;
                // Browsers send an empty part when no file was picked
                if !filename.is_empty() {
                    form.files.push((filename, data.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// A non-negative integer, or nothing
fn parse_folder_index(value: Option<&str>) -> Option<usize> {
    value?.trim().parse().ok()
}

/// Saves the uploaded files into the chosen folder and returns (folder, filenames).
async fn store_upload(
    state: &AppState,
    client: &Client,
    mut multipart: Multipart,
) -> Result<(String, Vec<String>), CloudServerError> {
    let form = read_upload_form(&mut multipart).await?;

    let index = parse_folder_index(form.folder.as_deref()).ok_or(RequestError::NoFolder)?;

    // The index refers to the listing as it is now, not as it was when the form
    // was rendered. If folders changed in between, it may pick a different one.
    let folders = state.list_folders(client.identity()).await?;
    let folder = folders
        .get(index)
        .cloned()
        .ok_or(RequestError::InvalidFolderIndex(index))?;

    if form.files.is_empty() {
        return Err(RequestError::NoFiles.into());
    }

    let files = form
        .files
        .into_iter()
        .map(|(name, data)| match sanitize_filename(&name) {
            Some(filename) => Ok(UploadedFile { filename, data }),
            None => Err(RequestError::InvalidFilename(name)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let root = state.cloud_path().to_path_buf();
    let target = folder.clone();
    let stored = run_blocking(move || store_files(&root, &target, &files)).await??;

    Ok((folder, stored.into_iter().map(|s| s.filename).collect()))
}

/// Multipart upload: `folder` is an index into the caller's folder list.
pub async fn upload(
    State(state): State<AppState>,
    client: Client,
    multipart: Multipart,
) -> Result<Redirect, CloudServerError> {
    match store_upload(&state, &client, multipart).await {
        Ok((folder, filenames)) => {
            let message = format!(
                "User {} upload files to folder {:?}: {:?}",
                client.identity(),
                folder,
                filenames
            );
            state.record(&client, &message).await;
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            let message = format!(
                "User {} tried to upload files, but failed ({})",
                client.identity(),
                e
            );
            state.record(&client, &message).await;
            Err(e)
        }
    }
}

/// One add or remove on a hide/ignore list, with its audit wording
#[derive(Clone, Copy)]
struct ListChange {
    add: bool,
    action: &'static str,
    unchanged_note: &'static str,
}

const HIDE: ListChange = ListChange {
    add: true,
    action: "hid folder",
    unchanged_note: " (already hidden)",
};
const UNHIDE: ListChange = ListChange {
    add: false,
    action: "unhid folder",
    unchanged_note: " (was not hidden)",
};
const IGNORE: ListChange = ListChange {
    add: true,
    action: "ignored pattern",
    unchanged_note: " (already ignored)",
};
const UNIGNORE: ListChange = ListChange {
    add: false,
    action: "unignored pattern",
    unchanged_note: " (was not ignored)",
};

/// Applies a list change on the blocking pool and audits it, successful or not.
async fn change_list(
    state: &AppState,
    client: &Client,
    list: &Arc<JsonList>,
    change: ListChange,
    item: String,
) -> Result<&'static str, CloudServerError> {
    let entry = item.clone();
    let outcome: Result<bool, ListError> = with_list(list, move |list| {
        if change.add {
            list.add(&entry)
        } else {
            list.remove(&entry)
        }
    })
    .await?;

    match outcome {
        Ok(changed) => {
            let note = if changed { "" } else { change.unchanged_note };
            let message = format!(
                "User {} {} {:?}{}",
                client.identity(),
                change.action,
                item,
                note
            );
            state.record(client, &message).await;
            Ok(DONE)
        }
        Err(e) => {
            let message = format!(
                "Failed: User {} {} {:?} ({})",
                client.identity(),
                change.action,
                item,
                e
            );
            state.record(client, &message).await;
            Err(e.into())
        }
    }
}

pub async fn hide(
    State(state): State<AppState>,
    client: Client,
    Path(folder): Path<String>,
) -> Result<&'static str, CloudServerError> {
    change_list(&state, &client, &state.hidden, HIDE, folder).await
}

pub async fn unhide(
    State(state): State<AppState>,
    client: Client,
    Path(folder): Path<String>,
) -> Result<&'static str, CloudServerError> {
    change_list(&state, &client, &state.hidden, UNHIDE, folder).await
}

pub async fn unhide_all(
    State(state): State<AppState>,
    client: Client,
) -> Result<&'static str, CloudServerError> {
    let outcome = with_list(&state.hidden, |list| {
        let hidden = list.get();
        hidden
            .iter()
            .try_for_each(|folder| list.remove(folder).map(|_| ()))
            .map(|()| hidden.len())
    })
    .await?;

    match outcome {
        Ok(count) => {
            let message = format!("User {} unhid all folders ({})", client.identity(), count);
            state.record(&client, &message).await;
            Ok(DONE)
        }
        Err(e) => {
            let message = format!("Failed: User {} unhid all folders ({})", client.identity(), e);
            state.record(&client, &message).await;
            Err(e.into())
        }
    }
}

pub async fn show_hides(State(state): State<AppState>) -> Result<Html<String>, CloudServerError> {
    let hidden = with_list(&state.hidden, JsonList::get).await?;
    Ok(Html(list_page(&hidden)))
}

pub async fn ignore(
    State(state): State<AppState>,
    client: Client,
    Path(pattern): Path<String>,
) -> Result<&'static str, CloudServerError> {
    change_list(&state, &client, &state.ignored, IGNORE, pattern).await
}

pub async fn unignore(
    State(state): State<AppState>,
    client: Client,
    Path(pattern): Path<String>,
) -> Result<&'static str, CloudServerError> {
    change_list(&state, &client, &state.ignored, UNIGNORE, pattern).await
}

pub async fn show_ignored(State(state): State<AppState>) -> Result<Html<String>, CloudServerError> {
    let ignored = with_list(&state.ignored, JsonList::get).await?;
    Ok(Html(list_page(&ignored)))
}

/// Deletes a file, or a whole tree for directories.
pub async fn delete(
    State(state): State<AppState>,
    client: Client,
    Path(target): Path<String>,
) -> Result<Html<String>, CloudServerError> {
    let root = state.cloud_path().to_path_buf();
    let relative = target.clone();
    let outcome = run_blocking(move || delete_entry(&root, &relative)).await?;

    match outcome {
        Ok(result) => {
            let (what, title) = match result.kind {
                DeletedKind::Tree => ("tree", "Tree removed"),
                DeletedKind::File => ("file", "File deleted"),
            };
            let message = format!("User {} removed {} {:?}", client.identity(), what, target);
            state.record(&client, &message).await;
            Ok(Html(success_page(&format!(
                "<h1>{}</h1> {}",
                title,
                escape_html(&target)
            ))))
        }
        Err(e) => {
            let message = format!(
                "User {} tried to incorrectly remove {:?} ({})",
                client.identity(),
                target,
                e
            );
            state.record(&client, &message).await;
            Err(e.into())
        }
    }
}

/// Creates a directory and its parents, then sends the browser to the listing.
pub async fn mkdir(
    State(state): State<AppState>,
    client: Client,
    Path(target): Path<String>,
) -> Result<Redirect, CloudServerError> {
    let root = state.cloud_path().to_path_buf();
    let relative = target.clone();
    let outcome = run_blocking(move || make_directory(&root, &relative)).await?;

    match outcome {
        Ok(()) => {
            let message = format!("User {} made dir {:?}", client.identity(), target);
            state.record(&client, &message).await;
            Ok(Redirect::to(FILES_URL))
        }
        Err(e) => {
            let message = format!(
                "User {} tried to make dir {:?}, but failed ({})",
                client.identity(),
                target,
                e
            );
            state.record(&client, &message).await;
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveQuery {
    from: Option<String>,
    to: Option<String>,
}

/// `?from=<path>&to=<path>`; both are relative to the storage root.
pub async fn move_path(
    State(state): State<AppState>,
    client: Client,
    Query(query): Query<MoveQuery>,
) -> Result<Response, CloudServerError> {
    let Some(from) = query.from.filter(|v| !v.is_empty()) else {
        let message = format!(
            "User {} tried to move, but forgot \"from\" argument",
            client.identity()
        );
        state.record(&client, &message).await;
        return Err(RequestError::MissingArgument("from").into());
    };

    let Some(to) = query.to.filter(|v| !v.is_empty()) else {
        let message = format!(
            "User {} tried to move, but forgot \"to\" argument",
            client.identity()
        );
        state.record(&client, &message).await;
        return Err(RequestError::MissingArgument("to").into());
    };

    let root = state.cloud_path().to_path_buf();
    let (source, destination) = (from.clone(), to.clone());
    let outcome = run_blocking(move || move_entry(&root, &source, &destination)).await?;

    match outcome {
        Ok(result) => {
            info!("Move resolved to {}", result.destination.display());
            let message = format!("User {} moved file {:?} to {:?}", client.identity(), from, to);
            state.record(&client, &message).await;
            Ok(Html(success_page("<h1>File moved correctly</h1>")).into_response())
        }
        Err(e) => {
            let message = format!(
                "User {} tried to move file {:?} to {:?}, but failed ({})",
                client.identity(),
                from,
                to,
                e
            );
            state.record(&client, &message).await;
            match e {
                StorageError::FileNotFound(_) => Ok((
                    StatusCode::BAD_REQUEST,
                    Html(failure_page("<h1>File not found</h1>")),
                )
                    .into_response()),
                other => Err(other.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_index_parsing() {
        assert_eq!(parse_folder_index(Some("0")), Some(0));
        assert_eq!(parse_folder_index(Some(" 2 ")), Some(2));
        assert_eq!(parse_folder_index(Some("-")), None);
        assert_eq!(parse_folder_index(Some("-1")), None);
        assert_eq!(parse_folder_index(Some("")), None);
        assert_eq!(parse_folder_index(None), None);
    }
}
