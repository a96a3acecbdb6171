//! Plain-text rendering of bugs and update results.

use bugzilla::{Bug, UpdateResponse};
use std::fmt::Write;

pub fn render_bug(bug: &Bug) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bug {} - {}", bug.id, bug.summary);
    let _ = writeln!(out, "{}", "=".repeat(80));

    let status = if bug.resolution.is_empty() {
        bug.status.clone()
    } else {
        format!("{} {}", bug.status, bug.resolution)
    };
    let rows = [
        ("Status", status),
        ("Product", format!("{} / {}", bug.product, bug.component)),
        ("Priority", bug.priority.clone()),
        ("Severity", bug.severity.clone()),
        ("Assignee", bug.assigned_to.clone()),
        ("Whiteboard", bug.whiteboard.clone()),
        ("URL", bug.url.clone()),
        ("Changed", bug.last_change_time.to_rfc3339()),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            let _ = writeln!(out, "{:<12} {}", label, value);
        }
    }
    if let Some(dupe) = bug.dupe_of {
        let _ = writeln!(out, "{:<12} {}", "Duplicate", dupe);
    }

    if !bug.flags.is_empty() {
        let _ = writeln!(out, "\nFlags:");
        for flag in &bug.flags {
            let requestee = if flag.requestee.is_empty() {
                String::new()
            } else {
                format!("({})", flag.requestee)
            };
            let _ = writeln!(out, "  {:<10} {}{}{}", flag.id, flag.name, flag.status, requestee);
        }
    }

    if !bug.attachments.is_empty() {
        let _ = writeln!(out, "\nAttachments:");
        for attachment in &bug.attachments {
            let obsolete = if attachment.is_obsolete { " [obsolete]" } else { "" };
            let _ = writeln!(
                out,
                "  {:<10} {} ({}, {} bytes){}",
                attachment.id,
                attachment.file_name,
                attachment.content_type,
                attachment.size,
                obsolete
            );
        }
    }

    for comment in &bug.comments {
        let private = if comment.is_private { " [private]" } else { "" };
        let _ = writeln!(
            out,
            "\nComment {} by {} at {}{}\n{}",
            comment.count,
            comment.creator,
            comment.creation_time.to_rfc3339(),
            private,
            comment.text
        );
    }
    out
}

pub fn render_update(ack: &UpdateResponse) -> String {
    let mut out = String::new();
    if ack.is_unchanged() {
        let _ = writeln!(out, "Bug {}: nothing changed", ack.id);
        return out;
    }
    let _ = writeln!(out, "✓ Updated bug {} at {}", ack.id, ack.last_change_time.to_rfc3339());
    for (field, change) in &ack.changes {
        let _ = writeln!(out, "  {}: -[{}] +[{}]", field, change.removed, change.added);
    }
    out
}
