pub mod g2p;
pub mod tokenize;
