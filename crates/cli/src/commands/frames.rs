//! `lector frames`: list the embedding points a snapshot carries.

use anyhow::Context;
use serde_json::json;

use lector::dom::FrameOrigin;
use lector::frames::{FrameAccess, discover_frames};
use lector::snapshot::Snapshot;

use crate::cli::FramesArgs;

pub fn run(args: FramesArgs) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    let loaded = Snapshot::from_json(&raw)
        .with_context(|| format!("parsing {}", args.snapshot.display()))?
        .build();
    let doc = &loaded.document;
    let frames = discover_frames(doc, doc.body());

    if args.json {
        let entries: Vec<_> = frames
            .iter()
            .map(|frame| {
                json!({
                    "frameId": frame.frame_id,
                    "origin": origin_label(frame.origin),
                    "access": access_label(&frame.access),
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    if frames.is_empty() {
        return Ok("no embedded frames".to_string());
    }
    let lines: Vec<String> = frames
        .iter()
        .map(|frame| {
            format!(
                "{}  {}  {}",
                frame.frame_id.as_deref().unwrap_or("-"),
                origin_label(frame.origin),
                access_label(&frame.access),
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

fn origin_label(origin: FrameOrigin) -> &'static str {
    match origin {
        FrameOrigin::SameOrigin => "sameOrigin",
        FrameOrigin::CrossOrigin => "crossOrigin",
        FrameOrigin::Unknown => "unknown",
    }
}

fn access_label(access: &FrameAccess) -> &'static str {
    match access {
        FrameAccess::Direct => "direct",
        FrameAccess::Channel => "channel",
        FrameAccess::Inaccessible => "inaccessible",
    }
}
