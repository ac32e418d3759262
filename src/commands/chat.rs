//! Interactive chat REPL
//!
//! Lines starting with `/` manage the collection selection; anything else
//! is a question. Newly fetched collections start selected; the selection
//! commands narrow or widen what the next question searches.

use crate::controller::{AppController, AppState};
use crate::error::Result;
use std::io::{BufRead, Write};
use tracing::debug;

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplInput {
    Select(String),
    Deselect(String),
    SelectAll,
    DeselectAll,
    List,
    Help,
    Question(String),
    Empty,
}

fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Empty;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplInput::Question(trimmed.to_string());
    };

    let (command, argument) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, Some(a.trim().to_string())),
        None => (rest, None),
    };

    match (command, argument) {
        ("select", Some(name)) if !name.is_empty() => ReplInput::Select(name),
        ("deselect", Some(name)) if !name.is_empty() => ReplInput::Deselect(name),
        ("all", None) => ReplInput::SelectAll,
        ("none", None) => ReplInput::DeselectAll,
        ("list", None) => ReplInput::List,
        _ => ReplInput::Help,
    }
}

/// Apply a selection command and describe the outcome.
fn run_selection_command(state: &mut AppState, input: ReplInput) -> String {
    match input {
        ReplInput::Select(name) => {
            if !state.collections.iter().any(|c| c == &name) {
                format!("Unknown collection '{}'", name)
            } else if state.selection.contains(&name) {
                format!("'{}' is already selected", name)
            } else {
                state.toggle_selection(&name);
                format!("Selected '{}'", name)
            }
        }
        ReplInput::Deselect(name) => {
            if state.selection.iter().any(|s| s == &name) {
                state.toggle_selection(&name);
                format!("Deselected '{}'", name)
            } else {
                format!("'{}' is not selected", name)
            }
        }
        ReplInput::SelectAll => {
            state.select_all();
            format!("Selected all {} collection(s)", state.selection.len())
        }
        ReplInput::DeselectAll => {
            state.deselect_all();
            "Selection cleared".to_string()
        }
        ReplInput::List => selection_listing(state),
        _ => help_text(),
    }
}

fn selection_listing(state: &AppState) -> String {
    let mut lines = Vec::with_capacity(state.collections.len());
    for name in &state.collections {
        let marker = if state.selection.contains(name) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(format!("{} {}", marker, name));
    }
    lines.join("\n")
}

fn help_text() -> String {
    "Commands:\n\
     /list              show collections and selection\n\
     /select <name>     add a collection to the selection\n\
     /deselect <name>   drop a collection from the selection\n\
     /all               select every collection\n\
     /none              clear the selection"
        .to_string()
}

/// Run the interactive chat loop.
///
/// Collections are fetched at startup and all of them start selected; the
/// slash commands adjust the selection between questions. An empty store is
/// reported and the loop never starts.
pub async fn cmd_chat(controller: &mut AppController) -> Result<()> {
    controller.refresh_collections().await?;

    if controller.state().collections.is_empty() {
        println!("No collections available. Ingest a source first.");
        return Ok(());
    }

    println!(
        "Chatting against {} collection(s). Type /list to inspect the \
         selection, /help for commands, Ctrl-D to exit.\n",
        controller.state().collections.len()
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match parse_input(&line) {
            ReplInput::Empty => continue,
            ReplInput::Question(question) => {
                match controller.send_message(&question).await {
                    Ok(answer) => println!("\n{}\n", answer),
                    Err(e) if e.is_validation() => println!("{}", e),
                    Err(e) => {
                        debug!("Chat turn error: {:?}", e);
                        println!("Something went wrong: {}", e);
                    }
                }
            }
            command => println!("{}", run_selection_command(controller.state_mut(), command)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatCompleter;
    use crate::config::Config;
    use crate::controller::IngestRequest;
    use crate::embed::Embedder;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FixedChat;

    #[async_trait]
    impl ChatCompleter for FixedChat {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok("an answer".to_string())
        }
    }

    async fn controller_with_sources(texts: &[&str]) -> AppController {
        let config = Config {
            qdrant_url: "http://localhost:6334".to_string(),
            openai_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        let mut controller = AppController::new(
            config,
            Arc::new(FixedEmbedder),
            Arc::new(MemoryStore::new()),
            Arc::new(FixedChat),
        )
        .unwrap();

        for text in texts {
            controller
                .add_source(IngestRequest::Text(text.to_string()))
                .await
                .unwrap();
        }
        controller
    }

    #[test]
    fn test_parse_commands_and_questions() {
        assert_eq!(
            parse_input("/select my_docs"),
            ReplInput::Select("my_docs".to_string())
        );
        assert_eq!(
            parse_input("/deselect my_docs"),
            ReplInput::Deselect("my_docs".to_string())
        );
        assert_eq!(parse_input("/all"), ReplInput::SelectAll);
        assert_eq!(parse_input("/none"), ReplInput::DeselectAll);
        assert_eq!(parse_input("/list"), ReplInput::List);
        assert_eq!(parse_input("/bogus"), ReplInput::Help);
        assert_eq!(parse_input("/select"), ReplInput::Help);
        assert_eq!(parse_input("  "), ReplInput::Empty);
        assert_eq!(
            parse_input("what is this?"),
            ReplInput::Question("what is this?".to_string())
        );
    }

    #[tokio::test]
    async fn test_selection_commands_drive_the_next_question() {
        let mut controller = controller_with_sources(&["First topic", "Second topic"]).await;
        assert_eq!(controller.state().selection.len(), 2);

        // Clear the selection, then questions are rejected without work.
        run_selection_command(controller.state_mut(), ReplInput::DeselectAll);
        assert!(controller.state().selection.is_empty());
        let err = controller.send_message("a question").await.unwrap_err();
        assert!(err.is_validation());

        // Select one collection back; questions flow again.
        let name = controller.state().collections[0].clone();
        let feedback =
            run_selection_command(controller.state_mut(), ReplInput::Select(name.clone()));
        assert_eq!(feedback, format!("Selected '{}'", name));
        assert_eq!(controller.state().selection, vec![name]);
        assert_eq!(
            controller.send_message("a question").await.unwrap(),
            "an answer"
        );

        run_selection_command(controller.state_mut(), ReplInput::SelectAll);
        assert_eq!(controller.state().selection.len(), 2);
    }

    #[tokio::test]
    async fn test_selecting_unknown_or_duplicate_names_is_reported() {
        let mut controller = controller_with_sources(&["Only topic"]).await;
        let name = controller.state().collections[0].clone();

        let feedback = run_selection_command(
            controller.state_mut(),
            ReplInput::Select("missing".to_string()),
        );
        assert_eq!(feedback, "Unknown collection 'missing'");
        assert_eq!(controller.state().selection.len(), 1);

        let feedback =
            run_selection_command(controller.state_mut(), ReplInput::Select(name.clone()));
        assert!(feedback.contains("already selected"));

        let feedback = run_selection_command(
            controller.state_mut(),
            ReplInput::Deselect("missing".to_string()),
        );
        assert_eq!(feedback, "'missing' is not selected");
    }

    #[tokio::test]
    async fn test_listing_marks_selected_collections() {
        let mut controller = controller_with_sources(&["Alpha topic", "Beta topic"]).await;
        let first = controller.state().collections[0].clone();

        run_selection_command(controller.state_mut(), ReplInput::Deselect(first.clone()));
        let listing = selection_listing(controller.state());

        assert!(listing.contains(&format!("[ ] {}", first)));
        assert!(listing.contains("[x]"));
    }
}
