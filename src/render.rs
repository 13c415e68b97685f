//! Terminal rendering of the conversation log. Strictly presentational;
//! swap this out for a real chat surface.

use std::collections::HashSet;

use tokio::sync::watch;

use crate::message::{Message, MessageBody, MessageLog};

/// One printable line per message.
pub fn render_message(msg: &Message) -> String {
    match &msg.body {
        MessageBody::User { text } => format!("you   ▸ {text}"),
        MessageBody::Assistant { text } => format!("cloud ▸ {text}"),
        MessageBody::Typing => "cloud ▸ …".to_string(),
        MessageBody::AccountChoice => {
            "cloud ▸ [ create ] [ login ] — type one to continue".to_string()
        }
        MessageBody::AccountForm { mode } => {
            format!("cloud ▸ [{mode} form] — type: <email> <password>")
        }
        MessageBody::Thumbnails => "cloud ▸ [photo thumbnails]".to_string(),
        MessageBody::Progress { upload_total } => {
            format!("cloud ▸ [uploading 0 / {upload_total}…]")
        }
        MessageBody::Results { results } => {
            let mut lines = vec![format!("cloud ▸ Found {} photos:", results.len())];
            for r in results {
                lines.push(format!("        {} {}", r.image_ref, r.caption));
            }
            lines.join("\n")
        }
        MessageBody::ActionButton { text } => format!("you   ▸ [ {text} ] — press Enter"),
    }
}

/// Append-only view over the log: remembers which ids were already printed.
///
/// Removals (typing indicators, superseded bubbles) stay on screen; a
/// terminal transcript is append-only.
#[derive(Default)]
pub struct Transcript {
    seen: HashSet<String>,
}

impl Transcript {
    /// Lines for messages not yet printed, in log order.
    pub fn drain_new(&mut self, log: &MessageLog) -> Vec<String> {
        log.messages()
            .iter()
            .filter(|msg| self.seen.insert(msg.id.clone()))
            .map(render_message)
            .collect()
    }
}

/// Print each newly appended message as the log changes.
pub async fn render_loop(mut rx: watch::Receiver<MessageLog>) {
    let mut transcript = Transcript::default();
    loop {
        let lines = transcript.drain_new(&rx.borrow_and_update());
        for line in lines {
            println!("{line}");
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{AccountMode, SearchResult};

    #[test]
    fn simple_kinds_render_their_text() {
        assert_eq!(render_message(&Message::user("hi")), "you   ▸ hi");
        assert_eq!(render_message(&Message::assistant("yo")), "cloud ▸ yo");
        assert_eq!(render_message(&Message::typing()), "cloud ▸ …");
    }

    #[test]
    fn form_renders_its_mode() {
        let msg = Message::new(MessageBody::AccountForm {
            mode: AccountMode::Login,
        });
        assert!(render_message(&msg).contains("login"));
    }

    #[test]
    fn transcript_prints_every_typing_indicator() {
        let mut transcript = Transcript::default();
        let log = MessageLog::new().append(vec![Message::user("q1"), Message::typing()]);
        assert_eq!(transcript.drain_new(&log).len(), 2);

        // The indicator is replaced, then a later search brings a new one.
        let log = log
            .apply(crate::message::LogOp::ReplaceKind(
                crate::message::MessageKind::Typing,
                vec![Message::assistant("a1")],
            ))
            .append(vec![Message::user("q2"), Message::typing()]);
        let lines = transcript.drain_new(&log);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.last().map(String::as_str), Some("cloud ▸ …"));
    }

    #[test]
    fn results_render_one_line_per_hit() {
        let msg = Message::new(MessageBody::Results {
            results: vec![
                SearchResult {
                    image_ref: "🌅".to_string(),
                    caption: "Matched \"sun\" in sunrise.jpg".to_string(),
                    from_store: false,
                },
                SearchResult {
                    image_ref: "🌊".to_string(),
                    caption: "Matched \"sun\" in waves.jpg".to_string(),
                    from_store: false,
                },
            ],
        });
        let rendered = render_message(&msg);
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("Found 2 photos"));
    }
}
