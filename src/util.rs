//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Models often wrap JSON in a markdown fence (```json ... ```); peel it off.
pub fn strip_code_fences(text: &str) -> &str {
  let t = text.trim();
  let Some(rest) = t.strip_prefix("```") else { return t };
  let rest = rest.strip_prefix("json").unwrap_or(rest);
  let rest = rest.strip_suffix("```").unwrap_or(rest);
  rest.trim()
}

/// Round to one decimal place.
pub fn round1(x: f64) -> f64 {
  (x * 10.0).round() / 10.0
}

/// First `max` characters of `s`, for log previews.
pub fn preview(s: &str, max: usize) -> String {
  s.chars().take(max).collect()
}
