// Cleans up whatever the user typed before we try to understand it.
//
// Only spaces get collapsed. Newlines and tabs inside a definition are the
// user's business.

/// Trim the ends and squash runs of spaces down to one
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut last_was_space = false;

    for c in text.trim().chars() {
        if c == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        normalized.push(c);
    }

    normalized
}
