//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// No nested or conditional logic.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Render whole seconds as zero-padded `MM:SS`. Negative input renders as `00:00`.
pub fn format_clock(total_secs: i64) -> String {
  let secs = total_secs.max(0);
  format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Log-safe truncation for large strings (player code, model replies).
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fills_every_occurrence() {
    let out = fill_template("{a}-{b}-{a}", &[("a", "1"), ("b", "2")]);
    assert_eq!(out, "1-2-1");
    assert_eq!(fill_template("{missing}", &[]), "{missing}");
  }

  #[test]
  fn clock_is_zero_padded() {
    assert_eq!(format_clock(180), "03:00");
    assert_eq!(format_clock(179), "02:59");
    assert_eq!(format_clock(5), "00:05");
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(-3), "00:00");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let t = trunc_for_log("ééééé", 2);
    assert!(t.starts_with("éé…"));
    assert!(t.ends_with("(10 bytes total)"));
  }
}
