use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::error;

use charla_config::{OllamaConfig, OpenAiConfig};
use charla_core::{ChatMessage, Conversation, Overrides, Role};
use charla_engine::{ChatCompletionsEngine, ResponsesEngine, SpanishThreadTutor, SpanishTutor};
use charla_transcript::TranscriptStore;

#[derive(Parser)]
#[command(name = "charla")]
#[command(about = "Charla — terminal chat with your Spanish tutor")]
#[command(version)]
struct Cli {
    /// Which completion backend to talk to
    #[arg(long, value_enum, default_value = "ollama")]
    backend: BackendKind,

    /// Path of the persisted chat transcript
    #[arg(long, default_value = "chat_history.json")]
    transcript: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendKind {
    /// Local Ollama-compatible chat-completions API (history replay)
    Ollama,
    /// Hosted responses API (server-side threading)
    Openai,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let store = TranscriptStore::new(cli.transcript);

    // Configuration problems abort here, naming the offending variable.
    match cli.backend {
        BackendKind::Ollama => {
            let config = OllamaConfig::load()?;
            run_shell(store, move || {
                ChatCompletionsEngine::new(&config, SpanishTutor)
            })
            .await
        }
        BackendKind::Openai => {
            let config = OpenAiConfig::load()?;
            run_shell(store, move || ResponsesEngine::new(&config, SpanishThreadTutor)).await
        }
    }
}

/// Read-eval-print loop over one conversation.
///
/// The transcript list held here is presentation state, kept separate from
/// whatever conversation state the engine owns; both are rebuilt on
/// `/reset`.
async fn run_shell<E, F>(store: TranscriptStore, make_engine: F) -> Result<()>
where
    E: Conversation<Reply = String>,
    F: Fn() -> E,
{
    let mut engine = make_engine();
    let mut transcript = store.load();

    println!("Charla — chat con tu tutor de español. /reset reinicia, /quit sale.");
    for message in &transcript {
        print_turn(message);
    }

    let stdin = io::stdin();
    loop {
        print!("tú> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                store.clear()?;
                transcript.clear();
                engine = make_engine();
                println!("Conversación reiniciada.");
            }
            input => {
                transcript.push(ChatMessage::user(input));
                store.save(&transcript)?;

                let reply = match engine.continue_conversation(input, Overrides::new()).await {
                    Ok(reply) => reply,
                    Err(err) => {
                        error!(%err, "completion request failed");
                        println!("(el tutor no está disponible ahora mismo)");
                        continue;
                    }
                };

                println!("tutor> {reply}");
                if !reply.trim().is_empty() {
                    transcript.push(ChatMessage::assistant(reply));
                    store.save(&transcript)?;
                }
            }
        }
    }

    Ok(())
}

fn print_turn(message: &ChatMessage) {
    let speaker = match message.role {
        Role::Assistant => "tutor",
        Role::User => "tú",
        Role::System | Role::Developer => "nota",
    };
    println!("{}> {}", speaker, message.content);
}
