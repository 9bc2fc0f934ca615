use std::sync::OnceLock;

use regex::Regex;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` with an optional `| default("fallback")` clause
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// A placeholder may carry a fallback via `{{ env.VAR | default("value") }}`,
/// used when the variable is unset. Expansion happens on the raw text before
/// deserialization, so config structs use plain `String`/`SecretString`.
/// TOML comment lines are passed through untouched.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut cursor = 0;
        for captures in placeholder_re().captures_iter(line) {
            let matched = captures.get(0).expect("capture 0 always present");
            let var_name = &captures[1];

            output.push_str(&line[cursor..matched.start()]);

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => match captures.get(2) {
                    Some(fallback) => output.push_str(fallback.as_str()),
                    None => return Err(format!("environment variable not found: `{var_name}`")),
                },
            }

            cursor = matched.end();
        }
        output.push_str(&line[cursor..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
