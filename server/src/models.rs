/// One record in a log, at the position it was assigned on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub offset: u64,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(offset: u64, value: Vec<u8>) -> Self {
        Self { offset, value }
    }
}
