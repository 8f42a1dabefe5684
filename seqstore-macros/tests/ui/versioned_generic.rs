use seqstore::Versioned;
use seqstore_macros::versioned;

#[versioned]
struct Envelope<T>
where
    T: Clone + Default,
{
    payload: T,
}

fn main() {
    let mut envelope: Envelope<u32> = Envelope::default();
    envelope.payload = 3;
    *envelope.version_mut() = seqstore::Version::from_value(4);
    assert_eq!(envelope.version().value(), 4);
}
