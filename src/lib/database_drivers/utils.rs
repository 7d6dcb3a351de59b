// Identifier quoting per dialect. The closing quote character is doubled so a
// name can never break out of the quoted identifier.

pub fn escape_sqlserver_name(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

pub fn escape_postgres_name(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn escape_mysql_name(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
