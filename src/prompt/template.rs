//! Prompt template store and rendering.

use std::path::{Path, PathBuf};

/// Path of the template file for `template_id`.
fn template_path(prompts_dir: &Path, template_id: &str) -> PathBuf {
    prompts_dir.join(format!("{}.txt", template_id))
}

/// Read the raw text of a named template.
pub fn load_template(prompts_dir: &Path, template_id: &str) -> std::io::Result<String> {
    std::fs::read_to_string(template_path(prompts_dir, template_id))
}

/// Fill the template's substitution sites with the context, then the query.
///
/// Sites are `%s` or `%v`; `%%` renders a literal percent sign. Sites past the
/// second are left as written.
pub fn render_prompt(template: &str, context: &str, query: &str) -> String {
    let mut values = [context, query].into_iter();
    let mut out = String::with_capacity(template.len() + context.len() + query.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(verb @ ('s' | 'v')) => {
                chars.next();
                match values.next() {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('%');
                        out.push(verb);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

/// Drop fenced code block markers (lines starting with three backticks).
pub fn clean_output(input: &str) -> String {
    input
        .split('\n')
        .filter(|line| !line.starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}
