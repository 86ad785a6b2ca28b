//! Global helper functions available to scripts.

use std::path::PathBuf;
use std::sync::Arc;

use rhai::{Engine, ImmutableString};
use tokio::runtime::Handle;

use crate::files;
use crate::llm::LlmProvider;
use crate::prompt;

/// Shared state the global helpers need.
#[derive(Clone)]
pub struct BindingContext {
    pub prompts_dir: PathBuf,
    pub llm: Arc<dyn LlmProvider>,
    /// Full model identifier used by `doPrompt`
    pub model: String,
    pub temperature: f32,
    pub runtime: Handle,
}

fn error_string(e: impl std::fmt::Display) -> String {
    format!("error: {}", e)
}

/// Register `doPrompt`, `getPrompt`, `getModel`, `saveFile`, `save_image` and `encode_image`.
pub fn register_helpers(engine: &mut Engine, ctx: BindingContext) {
    let prompt_ctx = ctx.clone();
    engine.register_fn("doPrompt", move |text: ImmutableString| -> String {
        let BindingContext {
            llm,
            model,
            temperature,
            runtime,
            ..
        } = &prompt_ctx;
        let result = runtime.block_on(llm.complete(model, *temperature, text.as_str(), &mut |_: &str| {}));
        match result {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(model = %model, error = %e, "doPrompt failed");
                error_string(e)
            }
        }
    });

    let prompts_dir = ctx.prompts_dir.clone();
    engine.register_fn("getPrompt", move |template_id: ImmutableString| -> String {
        match prompt::load_template(&prompts_dir, template_id.as_str()) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(template = %template_id, error = %e, "Prompt template not found");
                String::new()
            }
        }
    });

    engine.register_fn("getModel", |alias: ImmutableString| -> String {
        prompt::resolve_model(alias.as_str()).to_string()
    });

    engine.register_fn(
        "saveFile",
        |content: ImmutableString, filename: ImmutableString| -> String {
            match files::save_to_file(content.as_str(), filename.as_str()) {
                Ok(()) => "done".to_string(),
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "saveFile failed");
                    error_string(e)
                }
            }
        },
    );

    engine.register_fn(
        "save_image",
        |encoded: ImmutableString, path: ImmutableString| -> String {
            match files::save_base64_png(encoded.as_str(), path.as_str()) {
                Ok(()) => format!("Image saved successfully: {}", path),
                Err(e) => error_string(e),
            }
        },
    );

    engine.register_fn("encode_image", |path: ImmutableString| -> String {
        files::encode_file_base64(path.as_str()).unwrap_or_else(error_string)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use tokio::runtime::Runtime;

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn complete(
            &self,
            model: &str,
            _temperature: f32,
            prompt: &str,
            on_chunk: &mut (dyn for<'s> FnMut(&'s str) + Send),
        ) -> Result<String, LlmError> {
            if prompt == "fail" {
                return Err(LlmError::Api("boom".to_string()));
            }
            let text = format!("{}: {}", model, prompt);
            on_chunk(&text);
            Ok(text)
        }
    }

    fn engine(prompts_dir: PathBuf, runtime: &Runtime) -> Engine {
        let mut engine = Engine::new();
        register_helpers(
            &mut engine,
            BindingContext {
                prompts_dir,
                llm: Arc::new(EchoLlm),
                model: "llama3.1".to_string(),
                temperature: 0.1,
                runtime: runtime.handle().clone(),
            },
        );
        engine
    }

    #[test]
    fn get_prompt_reads_template_or_returns_empty() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ct.txt"), "Context: %s\nQ: %s").unwrap();
        let engine = engine(dir.path().to_path_buf(), &rt);

        let text: String = engine.eval(r#"getPrompt("ct")"#).unwrap();
        assert_eq!(text, "Context: %s\nQ: %s");

        let missing: String = engine.eval(r#"getPrompt("missing")"#).unwrap();
        assert_eq!(missing, "");
    }

    #[test]
    fn get_model_maps_aliases() {
        let rt = Runtime::new().unwrap();
        let engine = engine(PathBuf::from("prompts"), &rt);

        let model: String = engine.eval(r#"getModel("c")"#).unwrap();
        assert_eq!(model, "codestral");
        let model: String = engine.eval(r#"getModel("zzz")"#).unwrap();
        assert_eq!(model, "llama3.1");
    }

    #[test]
    fn do_prompt_runs_completion() {
        let rt = Runtime::new().unwrap();
        let engine = engine(PathBuf::from("prompts"), &rt);

        let out: String = engine.eval(r#"doPrompt("hello")"#).unwrap();
        assert_eq!(out, "llama3.1: hello");

        let out: String = engine.eval(r#"doPrompt("fail")"#).unwrap();
        assert_eq!(out, "error: LLM API error: boom");
    }

    #[test]
    fn save_file_writes_content() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let engine = engine(dir.path().to_path_buf(), &rt);

        let script = format!(r#"saveFile("remember", "{}")"#, path.display());
        let out: String = engine.eval(&script).unwrap();
        assert_eq!(out, "done");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "remember");

        let bad = format!(r#"saveFile("x", "{}")"#, dir.path().join("no/such/dir.txt").display());
        let out: String = engine.eval(&bad).unwrap();
        assert!(out.starts_with("error: "));
    }

    #[test]
    fn encode_then_save_image_round_trips() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.png");
        let dst = dir.path().join("out.png");
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 128, 255, 255]));
        img.save(&src).unwrap();
        let engine = engine(dir.path().to_path_buf(), &rt);

        let script = format!(
            r#"
            let a = encode_image("{src}");
            let b = encode_image("{src}");
            if a != b {{ throw "unstable encoding"; }}
            save_image("data:image/png;base64," + a, "{dst}")
            "#,
            src = src.display(),
            dst = dst.display()
        );
        let out: String = engine.eval(&script).unwrap();
        assert_eq!(out, format!("Image saved successfully: {}", dst.display()));
        assert_eq!(image::open(&dst).unwrap().to_rgba8(), img);
    }

    #[test]
    fn image_helpers_fail_soft() {
        let rt = Runtime::new().unwrap();
        let engine = engine(PathBuf::from("prompts"), &rt);

        let out: String = engine.eval(r#"encode_image("/definitely/not/here.png")"#).unwrap();
        assert!(out.starts_with("error: "));
        let out: String = engine.eval(r#"save_image("???", "/tmp/never.png")"#).unwrap();
        assert!(out.starts_with("error: failed to decode base64 image"));
    }
}
