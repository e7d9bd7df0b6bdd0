use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::multipart;
use crate::core::letters::{
    DriveApi, DriveError, DriveFolder, NewDocument, SavedLetter, FOLDER_MIME_TYPE,
};

pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com";

/// Fields Drive echoes back after an upload.
const UPLOAD_FIELDS: &str = "id,name,createdTime,modifiedTime,webViewLink";

/// Fields requested per file when listing a folder.
const LIST_FIELDS: &str =
    "nextPageToken,files(id,name,createdTime,modifiedTime,webViewLink,webContentLink)";

// =============================================================================
// DRIVE API RESPONSE STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList<T> {
    // A path default keeps serde from requiring `T: Default`.
    #[serde(default = "Vec::new")]
    files: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

// =============================================================================
// GOOGLE DRIVE CLIENT
// =============================================================================

/// Minimal Drive v3 REST client. It exposes only the calls the letter workflow needs.
pub struct GoogleDriveClient {
    client: Client,
    base_url: String,
}

impl GoogleDriveClient {
    /// `base_url` is normally [`DEFAULT_DRIVE_BASE_URL`]; tests point it at a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DriveError> {
        let client = Client::builder()
            .user_agent(concat!("letter-writer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.base_url)
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/drive/v3/files", self.base_url)
    }

    /// Quotes a value for use inside a Drive `q` string literal.
    fn quote(value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "\\'")
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, DriveError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message);
            tracing::debug!("Drive API error ({}): {}", status, text);
            return Err(DriveError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DriveError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DriveApi for GoogleDriveClient {
    async fn find_folders(&self, token: &str, name: &str) -> Result<Vec<DriveFolder>, DriveError> {
        let query = format!(
            "name='{}' and mimeType='{}' and trashed=false",
            Self::quote(name),
            FOLDER_MIME_TYPE
        );
        tracing::debug!("Searching Drive: {}", query);

        let response = self
            .client
            .get(self.files_url())
            .header("Authorization", format!("Bearer {}", token))
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        let list: FileList<DriveFolder> = Self::parse(response).await?;
        Ok(list.files)
    }

    async fn create_folder(&self, token: &str, name: &str) -> Result<DriveFolder, DriveError> {
        let response = self
            .client
            .post(self.files_url())
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "name": name,
                "mimeType": FOLDER_MIME_TYPE,
            }))
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        let mut folder: DriveFolder = Self::parse(response).await?;
        if folder.name.is_empty() {
            folder.name = name.to_string();
        }
        Ok(folder)
    }

    async fn create_document(
        &self,
        token: &str,
        document: &NewDocument,
    ) -> Result<SavedLetter, DriveError> {
        let metadata = serde_json::to_string(&document.metadata)
            .map_err(|e| DriveError::Decode(e.to_string()))?;
        let body =
            multipart::related_body(&metadata, document.body_content_type, &document.body);

        tracing::debug!(
            name = %document.metadata.name,
            bytes = body.len(),
            "Uploading letter to Drive"
        );

        let response = self
            .client
            .post(self.upload_url())
            .header("Authorization", format!("Bearer {}", token))
            .header(CONTENT_TYPE, multipart::content_type())
            .query(&[("uploadType", "multipart"), ("fields", UPLOAD_FIELDS)])
            .body(body)
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        Self::parse(response).await
    }

    async fn list_children(
        &self,
        token: &str,
        folder_id: &str,
    ) -> Result<Vec<SavedLetter>, DriveError> {
        let query = format!("'{}' in parents and trashed=false", Self::quote(folder_id));
        let mut letters = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.files_url())
                .header("Authorization", format!("Bearer {}", token))
                .query(&[("q", query.as_str()), ("fields", LIST_FIELDS)]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| DriveError::Transport(e.to_string()))?;

            let page: FileList<SavedLetter> = Self::parse(response).await?;
            letters.extend(page.files);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Listed {} letter(s) in folder {}", letters.len(), folder_id);
        Ok(letters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::TokenSource;
    use crate::core::letters::{DocumentMetadata, LetterError, LetterService, DOCUMENT_MIME_TYPE};
    use serde_json::json;
    use wiremock::matchers::{
        body_json, body_string, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FOLDER_QUERY: &str =
        "name='Letters' and mimeType='application/vnd.google-apps.folder' and trashed=false";

    fn file_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "createdTime": "2024-06-01T12:00:00.000Z",
            "modifiedTime": "2024-06-02T08:30:00.000Z",
            "webViewLink": format!("https://docs.google.com/document/d/{}/edit", id)
        })
    }

    struct StaticToken;

    #[async_trait]
    impl TokenSource for StaticToken {
        async fn access_token(&self) -> Option<String> {
            Some("tok".to_string())
        }
    }

    #[test]
    fn test_quote_escapes_literals() {
        assert_eq!(GoogleDriveClient::quote("Bob's"), "Bob\\'s");
        assert_eq!(GoogleDriveClient::quote("a\\b"), "a\\\\b");
    }

    #[tokio::test]
    async fn test_find_folders_sends_query_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", FOLDER_QUERY))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "f1", "name": "Letters"}, {"id": "f2", "name": "Letters"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let folders = client.find_folders("tok", "Letters").await.unwrap();
        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[tokio::test]
    async fn test_create_folder_posts_folder_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .and(body_json(json!({
                "name": "Letters",
                "mimeType": "application/vnd.google-apps.folder"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "drive#file",
                "id": "new-folder",
                "mimeType": "application/vnd.google-apps.folder"
            })))
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let folder = client.create_folder("tok", "Letters").await.unwrap();
        assert_eq!(folder.id, "new-folder");
        assert_eq!(folder.name, "Letters");
    }

    #[tokio::test]
    async fn test_create_document_sends_multipart_upload() {
        let server = MockServer::start().await;
        let document = NewDocument {
            metadata: DocumentMetadata {
                name: "Dear Ada".to_string(),
                mime_type: DOCUMENT_MIME_TYPE.to_string(),
                parents: vec!["f1".to_string()],
            },
            body: "Hello World".to_string(),
            body_content_type: "text/plain",
        };
        let expected_body = multipart::related_body(
            &serde_json::to_string(&document.metadata).unwrap(),
            "text/plain",
            "Hello World",
        );

        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .and(query_param("uploadType", "multipart"))
            .and(query_param("fields", UPLOAD_FIELDS))
            .and(header(
                "Content-Type",
                "multipart/related; boundary=-------314159265358979323846",
            ))
            .and(body_string(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("d1", "Dear Ada")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let letter = client.create_document("tok", &document).await.unwrap();
        assert_eq!(letter.id, "d1");
        assert_eq!(letter.view_link, "https://docs.google.com/document/d/d1/edit");
    }

    #[tokio::test]
    async fn test_list_children_follows_pages() {
        let server = MockServer::start().await;
        let query = "'f1' in parents and trashed=false";

        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", query))
            .and(query_param("fields", LIST_FIELDS))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nextPageToken": "p2",
                "files": [file_json("a", "First")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", query))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [file_json("b", "Second")]
            })))
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let letters = client.list_children("tok", "f1").await.unwrap();
        let names: Vec<&str> = letters.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_list_children_without_files_key_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        assert!(client.list_children("tok", "f1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_body_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Insufficient Permission"}
            })))
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let err = client.find_folders("tok", "Letters").await.unwrap_err();
        assert_eq!(
            err,
            DriveError::Remote {
                status: 403,
                message: Some("Insufficient Permission".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_error_without_json_has_no_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let err = client.list_children("tok", "f1").await.unwrap_err();
        assert_eq!(err.remote_message(), None);
        assert!(matches!(err, DriveError::Remote { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_write_creates_missing_folder_then_uploads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", FOLDER_QUERY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "created"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(file_json("d9", "Untitled Letter")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let service = LetterService::new(client, StaticToken);
        let letter = service
            .write_letter("tok", "", "<p>Hello&nbsp;World</p>")
            .await
            .unwrap();
        assert_eq!(letter.id, "d9");

        let requests = server.received_requests().await.unwrap();
        let upload = requests
            .iter()
            .find(|r| r.url.path() == "/upload/drive/v3/files")
            .unwrap();
        let body = String::from_utf8(upload.body.clone()).unwrap();
        assert!(body.contains(r#""name":"Untitled Letter""#));
        assert!(body.contains(r#""parents":["created"]"#));
        assert!(body.contains("\r\n\r\nHello World\r\n"));
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_remote_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "f1", "name": "Letters"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "Invalid multipart request"}
            })))
            .mount(&server)
            .await;

        let client = GoogleDriveClient::with_base_url(server.uri()).unwrap();
        let service = LetterService::new(client, StaticToken);
        let err = service
            .save_draft_to_drive(&crate::core::drafts::Draft {
                title: "t".to_string(),
                content: "<p>c</p>".to_string(),
                last_saved_at: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LetterError::Save(ref m) if m == "Invalid multipart request"));
    }
}
