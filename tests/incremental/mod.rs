mod tests_equivalence;
mod tests_reuse;
