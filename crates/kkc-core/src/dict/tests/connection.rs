use crate::dict::connection::ConnectionMatrix;
use crate::dict::DictError;

#[test]
fn test_mozc_text() {
    let m = ConnectionMatrix::from_text("2\n0\n10\n20\n30\n").unwrap();
    assert_eq!(m.num_ids(), 2);
    assert_eq!(m.cost(0, 0), 0);
    assert_eq!(m.cost(0, 1), 10);
    assert_eq!(m.cost(1, 0), 20);
    assert_eq!(m.cost(1, 1), 30);
}

#[test]
fn test_mecab_triplets() {
    let m = ConnectionMatrix::from_text("2 2\n0 1 5\n1 1 50\n").unwrap();
    assert_eq!(m.cost(0, 1), 5);
    assert_eq!(m.cost(1, 1), 50);
    assert_eq!(m.cost(1, 0), 0, "unlisted pairs default to 0");
}

#[test]
fn test_text_errors() {
    assert!(matches!(
        ConnectionMatrix::from_text(""),
        Err(DictError::Parse(_))
    ));
    assert!(matches!(
        ConnectionMatrix::from_text("2 3\n"),
        Err(DictError::Parse(_))
    ));
    assert!(matches!(
        ConnectionMatrix::from_text("2\n1\n2\n3\n"),
        Err(DictError::Corrupt(_))
    ));
    assert!(matches!(
        ConnectionMatrix::from_text("2 2\n5 0 1\n"),
        Err(DictError::Parse(_))
    ));
    assert!(matches!(
        ConnectionMatrix::from_text("1\n-4\n"),
        Err(DictError::Corrupt(_))
    ));
}

#[test]
fn test_out_of_bounds_is_zero() {
    let m = ConnectionMatrix::from_costs(2, vec![1, 2, 3, 4]).unwrap();
    assert_eq!(m.cost(2, 0), 0);
    assert_eq!(m.cost(0, 7), 0);
}

#[test]
fn test_from_costs_validates() {
    assert!(ConnectionMatrix::from_costs(0, vec![]).is_err());
    assert!(ConnectionMatrix::from_costs(2, vec![1, 2, 3]).is_err());
    assert!(ConnectionMatrix::from_costs(1, vec![-1]).is_err());
}

#[test]
fn test_binary_roundtrip() {
    let m = ConnectionMatrix::from_costs(3, (0..9).map(|c| c * 100).collect()).unwrap();
    let m2 = ConnectionMatrix::from_bytes(&m.to_bytes()).unwrap();
    for l in 0..3 {
        for r in 0..3 {
            assert_eq!(m.cost(l, r), m2.cost(l, r));
        }
    }
}

#[test]
fn test_binary_errors() {
    assert!(matches!(
        ConnectionMatrix::from_bytes(b"KKC"),
        Err(DictError::InvalidHeader)
    ));
    assert!(matches!(
        ConnectionMatrix::from_bytes(b"XXXX\x01\x01\x00"),
        Err(DictError::InvalidMagic)
    ));
    assert!(matches!(
        ConnectionMatrix::from_bytes(b"KKCX\x07\x01\x00"),
        Err(DictError::UnsupportedVersion(7))
    ));

    let mut bytes = ConnectionMatrix::from_costs(2, vec![0, 1, 2, 3])
        .unwrap()
        .to_bytes();
    bytes.pop();
    assert!(ConnectionMatrix::from_bytes(&bytes).is_err(), "odd length");
    bytes.pop();
    assert!(matches!(
        ConnectionMatrix::from_bytes(&bytes),
        Err(DictError::Corrupt(_))
    ));

    // negative cost smuggled into a well-formed image
    let mut bytes = ConnectionMatrix::from_costs(1, vec![0]).unwrap().to_bytes();
    let n = bytes.len();
    bytes[n - 2..].copy_from_slice(&(-5i16).to_le_bytes());
    assert!(matches!(
        ConnectionMatrix::from_bytes(&bytes),
        Err(DictError::Corrupt(_))
    ));
}

#[test]
fn test_open_mmap() {
    let m = ConnectionMatrix::from_costs(2, vec![0, 50, 0, 50]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.conn");
    m.save(&path).unwrap();

    let mapped = ConnectionMatrix::open(&path).unwrap();
    assert!(mapped.is_mapped());
    assert_eq!(mapped.cost(1, 1), 50);
    assert_eq!(mapped.cost(1, 0), 0);
    assert_eq!(mapped.to_bytes(), m.to_bytes());
}
