use seqstore_macros::versioned;

#[versioned(foo = 1)]
struct Account {
    owner: String,
}

fn main() {}
