mod tests_precedence;
mod tests_recovery;
