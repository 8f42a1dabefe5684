use seqstore_macros::versioned;

#[versioned]
enum Shape {
    Circle,
}

fn main() {}
