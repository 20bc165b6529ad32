//! `lector extract`: snapshot file in, narration passages out.

use std::sync::Arc;

use anyhow::Context;

use lector::dom::text::fix_paragraphs;
use lector::frames::FrameConnection;
use lector::snapshot::Snapshot;
use lector::{ExtractOptions, ExtractionSession};
use lector_protocol::{FrameInfo, FrameMessage, mint_frame_id};

use crate::cli::ExtractArgs;

pub async fn run(args: ExtractArgs, quiet: bool) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    let snapshot = Snapshot::from_json(&raw)
        .with_context(|| format!("parsing {}", args.snapshot.display()))?;
    let url = snapshot.url.clone();
    let title = snapshot.title.clone();
    let loaded = snapshot.build();

    // Cross-origin sub-documents get their own sessions, served over the
    // paired in-process channel.
    let opts = ExtractOptions::default();
    let (connection, mut outbound) = FrameConnection::new(opts.frame_timeout);
    let children: Vec<(String, Arc<ExtractionSession>)> = loaded
        .frame_contents
        .into_iter()
        .map(|(frame_id, doc)| {
            let info = FrameInfo {
                is_main_frame: false,
                frame_id: frame_id.clone(),
                url: None,
                title: None,
            };
            (frame_id, Arc::new(ExtractionSession::new(doc, info)))
        })
        .collect();
    let responder = Arc::clone(&connection);
    tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let FrameMessage::Request(request) = message.message else { continue };
            let Some((_, child)) = children.iter().find(|(id, _)| *id == message.frame_id)
            else {
                continue;
            };
            let response = child.handle_frame_request(request).await;
            responder.handle_response(response);
        }
    });

    let info = FrameInfo { is_main_frame: true, frame_id: mint_frame_id(), url, title };
    let session = ExtractionSession::new(loaded.document, info)
        .with_options(opts)
        .with_channel(connection);
    let mut passages = session.texts(0, quiet).await.unwrap_or_default();
    if args.join_lines {
        passages = fix_paragraphs(&passages);
    }

    if args.json {
        Ok(serde_json::to_string_pretty(&passages)?)
    } else {
        Ok(passages.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_snapshot(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("page.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn extracts_passages_from_a_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(
            &dir,
            r#"{
                "body": { "children": [
                    { "tag": "div", "children": [
                        { "tag": "p", "children": [
                            { "kind": "text", "text": "Hello world." }
                        ] }
                    ] }
                ] }
            }"#,
        );
        let args = ExtractArgs { snapshot: path, json: false, join_lines: false };
        assert_eq!(run(args, true).await.unwrap(), "Hello world.");
    }

    #[tokio::test]
    async fn json_output_is_a_passage_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(
            &dir,
            r#"{
                "body": { "children": [
                    { "tag": "div", "children": [
                        { "tag": "p", "children": [
                            { "kind": "text", "text": "Hello world." }
                        ] }
                    ] }
                ] }
            }"#,
        );
        let args = ExtractArgs { snapshot: path, json: true, join_lines: false };
        let output = run(args, true).await.unwrap();
        let passages: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(passages, vec!["Hello world."]);
    }

    #[tokio::test]
    async fn missing_file_reports_its_path() {
        let args = ExtractArgs {
            snapshot: PathBuf::from("/nonexistent/page.json"),
            json: false,
            join_lines: false,
        };
        let error = run(args, true).await.unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/page.json"));
    }

    #[tokio::test]
    async fn invalid_json_reports_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&dir, "not json at all");
        let args = ExtractArgs { snapshot: path, json: false, join_lines: false };
        let error = run(args, true).await.unwrap_err();
        assert!(format!("{error:#}").contains("parsing"));
    }
}
