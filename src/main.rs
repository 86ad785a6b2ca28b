//! prompt-pilot - CLI Entry Point
//!
//! Runs the bootstrap script, renders and completes a prompt, then hands the
//! completion to an optional post-completion script.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use prompt_pilot::{
    config::Config,
    files,
    llm::{LlmProvider, OllamaClient},
    prompt,
    scripting::{BindingContext, ScriptHost},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "prompt-pilot")]
#[command(about = "Render a prompt template, complete it with a local LLM and script the result")]
#[command(version)]
struct Cli {
    /// Model alias (l, d, c, s, cl)
    #[arg(short = 'm', default_value = "l")]
    model: String,

    /// Sampling temperature
    #[arg(short = 'p', default_value_t = 0.1)]
    temperature: f32,

    /// Prompt template id (file `{id}.txt` in the prompts directory)
    #[arg(short = 't', default_value = "ct")]
    template: String,

    /// Command text substituted after the context
    #[arg(short = 'c')]
    command: Option<String>,

    /// Read context from this file
    #[arg(long = "cf")]
    context_file: Option<PathBuf>,

    /// Use this text as context
    #[arg(long = "cd")]
    context_data: Option<String>,

    /// Strip fenced code block markers from the completion
    #[arg(long)]
    clean: bool,

    /// Save the completion to this file
    #[arg(short = 'o')]
    output: Option<PathBuf>,

    /// Print the rendered prompt and final completion, enable debug logs
    #[arg(short = 'd')]
    debug: bool,

    /// Script to run after the completion (sees it as `output`)
    #[arg(short = 's')]
    script: Option<PathBuf>,
}

fn init_logging(debug: bool) {
    let env_filter = if debug {
        EnvFilter::new("prompt_pilot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prompt_pilot=info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// First line of piped stdin, or empty when stdin is a terminal.
fn read_piped_stdin() -> std::io::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line)
}

fn main() -> anyhow::Result<()> {
    // Parsing only reads argv; the bootstrap still runs before any flag is acted on,
    // but `doPrompt` needs the model and temperature while it runs.
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = Config::from_env()?;
    // Script bindings block on this runtime from the main thread, so it is
    // built by hand rather than entered through `#[tokio::main]`.
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let llm: Arc<dyn LlmProvider> = Arc::new(OllamaClient::new(config.ollama_url.clone()));
    let model = prompt::resolve_model(&cli.model);

    let mut host = ScriptHost::new(
        BindingContext {
            prompts_dir: config.prompts_dir.clone(),
            llm: llm.clone(),
            model: model.to_string(),
            temperature: cli.temperature,
            runtime: runtime.handle().clone(),
        },
        &config.automation_url,
    );
    host.run_file(&config.bootstrap_script)?;

    let Some(command) = cli.command.as_deref() else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };

    let context = files::resolve_context(
        cli.context_file.as_deref(),
        cli.context_data.as_deref(),
        read_piped_stdin,
    )
    .context("failed to read prompt context")?;
    let template = prompt::load_template(&config.prompts_dir, &cli.template)
        .with_context(|| format!("failed to load prompt template '{}'", cli.template))?;
    let rendered = prompt::render_prompt(&template, &context, command);
    tracing::debug!(template = %cli.template, model = %model, "Rendered prompt");

    if cli.debug {
        println!("{}", rendered);
    }

    let stream = config.stream_output;
    let mut completion = runtime
        .block_on(llm.complete(model, cli.temperature, &rendered, &mut |chunk: &str| {
            if stream {
                print!("{}", chunk);
                let _ = std::io::stdout().flush();
            }
        }))
        .context("completion failed")?;
    if stream {
        println!();
    }

    if cli.clean {
        completion = prompt::clean_output(&completion);
    }

    if let Some(path) = &cli.output {
        files::save_to_file(&completion, path)
            .with_context(|| format!("failed to save output to {}", path.display()))?;
    }

    if let Some(script) = &cli.script {
        host.set_output(&completion);
        host.run_file(script)?;
    }

    if cli.debug {
        println!("{}", completion);
    }

    Ok(())
}
