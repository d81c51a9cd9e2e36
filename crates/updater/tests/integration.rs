//! Integration tests for updater crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;
    use updatekit_config::Config;
    use updatekit_errors::{Error, NetworkError, StorageError, VersionError};
    use updatekit_events::{channel, AppEvent, DownloadEvent, UpdateEvent};
    use updatekit_updater::*;

    fn client_for(server: &MockServer, download_dir: &Path, installed: &str) -> UpdateClient {
        let mut config = Config::default();
        config.update.server_url = Some(server.base_url());
        config.paths.download_dir = Some(download_dir.to_path_buf());
        UpdateClient::new(config.into_shared(), StaticVersion::new(installed))
    }

    async fn mock_version<'a>(server: &'a MockServer, body: &'static str) -> httpmock::Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/version.txt");
                then.status(200).body(body);
            })
            .await
    }

    #[tokio::test]
    async fn test_check_update_up_to_date() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        let mock = mock_version(&server, "1.0.3\n").await;

        let client = client_for(&server, temp.path(), "1.0.3");
        let status = client.check_update().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            status,
            UpdateStatus::UpToDate {
                current: "1.0.3".to_string(),
                latest: "1.0.3".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_check_update_available() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        mock_version(&server, "  1.0.4\r\n").await;

        let (tx, mut rx) = channel();
        let client = client_for(&server, temp.path(), "1.0.3").with_events(tx);
        let status = client.check_update().await.unwrap();

        assert!(status.is_available());
        assert_eq!(status.latest(), "1.0.4");
        assert_eq!(status.current(), "1.0.3");

        let mut saw_started = false;
        let mut saw_available = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::Update(UpdateEvent::CheckStarted { url }) => {
                    assert!(url.ends_with("/version.txt"));
                    saw_started = true;
                }
                AppEvent::Update(UpdateEvent::Available { latest, .. }) => {
                    assert_eq!(latest, "1.0.4");
                    saw_available = true;
                }
                _ => {}
            }
        }
        assert!(saw_started && saw_available);
    }

    #[tokio::test]
    async fn test_check_update_test_build_of_installed_release() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        mock_version(&server, "1.0.3-test-02031200").await;

        let client = client_for(&server, temp.path(), "1.0.3");
        let status = client.check_update().await.unwrap();
        assert!(status.is_available());

        let client = client_for(&server, temp.path(), "1.0.3-test-02032310");
        let status = client.check_update().await.unwrap();
        assert!(!status.is_available());
    }

    #[tokio::test]
    async fn test_check_update_unknown_installed_version() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        mock_version(&server, "0.0.1").await;

        let mut config = Config::default();
        config.update.server_url = Some(server.base_url());
        config.paths.download_dir = Some(temp.path().to_path_buf());
        let provider = || -> Result<String, Error> { Err(Error::internal("no package info")) };
        let client = UpdateClient::new(config.into_shared(), provider);

        let status = client.check_update().await.unwrap();
        assert_eq!(status.current(), "unknown");
        assert!(status.is_available());
    }

    #[tokio::test]
    async fn test_check_update_invalid_format() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        mock_version(&server, "<html>maintenance</html>").await;

        let client = client_for(&server, temp.path(), "1.0.3");
        let error = client.check_update().await.unwrap_err();
        assert!(matches!(
            error,
            Error::Version(VersionError::InvalidFormat { ref input }) if input == "<html>maintenance</html>"
        ));
    }

    #[tokio::test]
    async fn test_check_update_http_error() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/version.txt");
                then.status(503);
            })
            .await;

        let (tx, mut rx) = channel();
        let client = client_for(&server, temp.path(), "1.0.3").with_events(tx);
        let error = client.check_update().await.unwrap_err();
        assert!(matches!(
            error,
            Error::Network(NetworkError::HttpError { status: 503, .. })
        ));

        let failed = std::iter::from_fn(|| rx.try_recv().ok()).find_map(|event| match event {
            AppEvent::Update(UpdateEvent::CheckFailed { failure }) => Some(failure),
            _ => None,
        });
        assert!(failed.is_some_and(|failure| failure.retryable));
    }

    #[tokio::test]
    async fn test_not_configured_makes_no_request() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        let mock = mock_version(&server, "1.0.4").await;

        let mut config = Config::default();
        config.paths.download_dir = Some(temp.path().to_path_buf());
        let shared = config.into_shared();
        let client = UpdateClient::new(shared.clone(), StaticVersion::new("1.0.3"));

        assert!(!client.is_update_server_configured().await);
        assert!(client.check_update().await.unwrap_err().is_not_configured());

        let mut handle = client.download_artifact("1.0.4");
        match handle.next().await {
            Some(DownloadUpdate::Failed(error)) => assert!(error.is_not_configured()),
            other => panic!("expected not-configured failure, got {other:?}"),
        }
        assert!(handle.next().await.is_none());
        assert_eq!(mock.hits_async().await, 0);

        // The address is picked up on the next call
        shared.write().await.update.server_url = Some(server.base_url());
        assert!(client.is_update_server_configured().await);
        assert_eq!(client.check_update().await.unwrap().latest(), "1.0.4");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_download_reports_progress_then_completes() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        let content = vec![42u8; 100_000];
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/EVCam-v1.0.4-release.apk");
                then.status(200).body(content.clone());
            })
            .await;

        let (tx, mut rx) = channel();
        let client = client_for(&server, temp.path(), "1.0.3").with_events(tx);
        let mut handle = client.download_artifact("1.0.4");

        let mut progress = Vec::new();
        let mut completed = None;
        while let Some(update) = handle.next().await {
            match update {
                DownloadUpdate::Progress(percent) => {
                    assert!(completed.is_none(), "progress after completion");
                    progress.push(percent);
                }
                DownloadUpdate::Complete(path) => completed = Some(path),
                DownloadUpdate::Failed(error) => panic!("download failed: {error}"),
            }
        }

        mock.assert_async().await;
        let path = completed.unwrap();
        assert_eq!(path, temp.path().join("EVCam_1.0.4.apk"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), content);

        assert!(!progress.is_empty());
        assert!(progress.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(!progress.contains(&0));
        assert_eq!(progress.last(), Some(&100));

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::Download(DownloadEvent::Started { .. }))));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Download(DownloadEvent::Completed { size: 100_000, .. })
        )));
    }

    #[tokio::test]
    async fn test_download_replaces_existing_file() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/EVCam-v1.0.4-release.apk");
                then.status(200).body("fresh artifact");
            })
            .await;

        let dest = temp.path().join("EVCam_1.0.4.apk");
        tokio::fs::write(&dest, b"an older and much longer partial artifact")
            .await
            .unwrap();

        let client = client_for(&server, temp.path(), "1.0.3");
        let path = client.download_artifact("1.0.4").finish().await.unwrap();

        assert_eq!(path, dest);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"fresh artifact");
    }

    #[tokio::test]
    async fn test_download_creates_missing_directory() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/EVCam-v2.0-release.apk");
                then.status(200).body("artifact");
            })
            .await;

        let nested = temp.path().join("updates").join("evcam");
        let client = client_for(&server, &nested, "1.0.3");
        let path = client.download_artifact("2.0").finish().await.unwrap();
        assert_eq!(path, nested.join("EVCam_2.0.apk"));
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/EVCam-v9.9.9-release.apk");
                then.status(404).body("Not Found");
            })
            .await;

        let client = client_for(&server, temp.path(), "1.0.3");
        let error = client.download_artifact("9.9.9").finish().await.unwrap_err();

        assert!(matches!(
            error,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
        assert!(!temp.path().join("EVCam_9.9.9.apk").exists());
    }

    #[tokio::test]
    async fn test_download_cancelled_through_handle() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/EVCam-v1.0.4-release.apk");
                then.status(200)
                    .delay(Duration::from_secs(5))
                    .body("too late");
            })
            .await;

        let (tx, mut rx) = channel();
        let client = client_for(&server, temp.path(), "1.0.3").with_events(tx);
        let handle = client.download_artifact("1.0.4");
        let canceller = handle.canceller();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let error = handle.finish().await.unwrap_err();
        assert!(error.is_cancelled());
        assert_eq!(error.to_string(), "download cancelled");
        assert!(!temp.path().join("EVCam_1.0.4.apk").exists());

        let cancelled = std::iter::from_fn(|| rx.try_recv().ok())
            .any(|e| matches!(e, AppEvent::Download(DownloadEvent::Cancelled { .. })));
        assert!(cancelled);
    }

    #[tokio::test]
    async fn test_cancel_download_targets_current_download() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/EVCam-v1.0.4-release.apk");
                then.status(200)
                    .delay(Duration::from_secs(5))
                    .body("too late");
            })
            .await;

        let client = client_for(&server, temp.path(), "1.0.3");
        let handle = client.download_artifact("1.0.4");

        tokio::time::sleep(Duration::from_millis(100)).await;
        client.cancel_download();
        client.cancel_download();
        assert!(handle.is_cancelled());

        let error = handle.finish().await.unwrap_err();
        assert!(error.is_cancelled());

        // Nothing left to cancel
        client.cancel_download();
    }

    #[tokio::test]
    async fn test_published_version_cannot_escape_download_dir() {
        let server = MockServer::start_async().await;
        let temp = tempdir().unwrap();
        let download_dir = temp.path().join("a").join("downloads");
        let version = mock_version(&server, "1.0/../../escaped").await;
        let artifact = server
            .mock_async(|when, then| {
                when.method(GET).path_contains("escaped-release.apk");
                then.status(200).body("payload");
            })
            .await;

        let client = client_for(&server, &download_dir, "1.0.3");
        let status = client.check_update().await.unwrap();
        assert_eq!(status.latest(), "1.0/../../escaped");

        let error = client
            .download_artifact(status.latest())
            .finish()
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            Error::Storage(StorageError::InvalidFileName { ref name }) if name == "EVCam_1.0/../../escaped.apk"
        ));

        assert!(!temp.path().join("a").join("escaped.apk").exists());
        assert!(!download_dir.join("EVCam_1.0").exists());
        assert_eq!(version.hits_async().await, 1);
        assert_eq!(artifact.hits_async().await, 0);
    }
}
