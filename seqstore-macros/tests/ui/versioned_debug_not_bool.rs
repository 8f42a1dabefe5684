use seqstore_macros::versioned;

#[versioned(debug = 1)]
struct Account {
    owner: String,
}

fn main() {}
