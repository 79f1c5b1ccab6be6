mod tests_incremental;
mod tests_sources;
mod tests_syntax;
