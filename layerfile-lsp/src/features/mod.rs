pub mod classifier;
pub mod compound;
pub mod legend;
pub mod semantic_tokens;

#[cfg(test)]
pub(crate) mod test_support;
