/// Split a command line on whitespace.
///
/// There is no quoting or escaping: `echo "a b"` becomes
/// `["echo", "\"a", "b\""]`. Runs of spaces or tabs do not produce empty
/// arguments.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
