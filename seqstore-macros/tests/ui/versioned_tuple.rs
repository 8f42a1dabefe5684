use seqstore_macros::versioned;

#[versioned]
struct Pair(u8, u8);

fn main() {}
