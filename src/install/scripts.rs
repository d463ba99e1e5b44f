//! Hook script templates written into `<claude dir>/scripts`

use std::path::Path;

const CLAUDE_DIR_PLACEHOLDER: &str = "__CLAUDE_DIR__";
const NOTIFIER_BIN_PLACEHOLDER: &str = "__NOTIFIER_BIN__";

// Entry point registered for every hook event
const NOTIFY_SCRIPT_TEMPLATE: &str = r#"#!/bin/bash
# Audio notification hook for Claude Code
# Usage: smart-notify.sh <event>   (hook metadata JSON on stdin)

EVENT="${1:-notification}"
CLAUDE_DIR="__CLAUDE_DIR__"
NOTIFIER_BIN="__NOTIFIER_BIN__"

# Toggled from the menu bar / `audio-notifier toggle`
if [ ! -f "$CLAUDE_DIR/.sounds-enabled" ]; then
    exit 0
fi

INPUT=$(cat)

# Claude Code passes the session working directory as .cwd
CWD=""
if command -v jq >/dev/null 2>&1; then
    CWD=$(printf '%s' "$INPUT" | jq -r '.cwd // empty' 2>/dev/null)
fi
if [ -z "$CWD" ]; then
    CWD="$PWD"
fi

echo "[$(date '+%Y-%m-%d %H:%M:%S')] $EVENT cwd=$CWD" >> "$CLAUDE_DIR/hook-execution.log"

if [ -x "$NOTIFIER_BIN" ]; then
    "$NOTIFIER_BIN" --claude-dir "$CLAUDE_DIR" notify "$EVENT" --cwd "$CWD" \
        >> "$CLAUDE_DIR/hook-execution.log" 2>&1 &
fi

exit 0
"#;

const UNINSTALL_SCRIPT_TEMPLATE: &str = r#"#!/bin/bash
# Removes the Audio Notifier hooks from Claude Code.
# Your audio-notifier.yaml is kept; a backup of settings.json is created first.

CLAUDE_DIR="__CLAUDE_DIR__"
NOTIFIER_BIN="__NOTIFIER_BIN__"

if [ ! -x "$NOTIFIER_BIN" ]; then
    echo "audio-notifier binary not found at $NOTIFIER_BIN" >&2
    exit 1
fi

exec "$NOTIFIER_BIN" --claude-dir "$CLAUDE_DIR" uninstall --yes
"#;

fn render(template: &str, claude_dir: &Path, notifier_bin: &Path) -> String {
    template
        .replace(CLAUDE_DIR_PLACEHOLDER, &claude_dir.to_string_lossy())
        .replace(NOTIFIER_BIN_PLACEHOLDER, &notifier_bin.to_string_lossy())
}

pub fn notify_script(claude_dir: &Path, notifier_bin: &Path) -> String {
    render(NOTIFY_SCRIPT_TEMPLATE, claude_dir, notifier_bin)
}

pub fn uninstall_script(claude_dir: &Path, notifier_bin: &Path) -> String {
    render(UNINSTALL_SCRIPT_TEMPLATE, claude_dir, notifier_bin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_replaced() {
        let script = notify_script(
            Path::new("/Users/me/.claude"),
            Path::new("/opt/homebrew/bin/audio-notifier"),
        );
        assert!(!script.contains("__"));
        assert!(script.contains("CLAUDE_DIR=\"/Users/me/.claude\""));
        assert!(script.contains("NOTIFIER_BIN=\"/opt/homebrew/bin/audio-notifier\""));
        assert!(script.starts_with("#!/bin/bash\n"));
    }
}
