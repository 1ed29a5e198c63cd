pub mod archive;
pub mod attachment;
pub mod extract;
pub mod flag;
pub mod transfer;

#[cfg(test)]
mod tests;
