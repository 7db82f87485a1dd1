use crate::{AbiResult, ParamType, Token, Word, WORD_LEN};

/// Encodes a list of tokens as one ABI tuple (head/tail layout).
pub fn encode(tokens: &[Token]) -> Vec<u8> { encode_sequence(tokens) }

/// Encodes one value the way it is stored in a memory slot.
///
/// The value is checked against `ty`, then encoded as a single-element tuple. When `ty` is
/// ABI-dynamic the leading offset word (always `0x20`) is dropped, leaving the length-prefixed
/// payload.
pub fn encode_literal(ty: &ParamType, token: &Token) -> AbiResult<Vec<u8>> {
    token.type_check(ty)?;
    let mut encoded = encode(std::slice::from_ref(token));
    if ty.is_abi_dynamic() {
        encoded.drain(..WORD_LEN);
    }
    Ok(encoded)
}

fn encode_sequence(items: &[Token]) -> Vec<u8> {
    let encoded: Vec<(bool, Vec<u8>)> =
        items.iter().map(|t| (t.is_abi_dynamic(), encode_token(t))).collect();

    let head_len: usize =
        encoded.iter().map(|(dynamic, body)| if *dynamic { WORD_LEN } else { body.len() }).sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (dynamic, body) in encoded {
        if dynamic {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&body);
        } else {
            head.extend_from_slice(&body);
        }
    }
    head.extend_from_slice(&tail);
    head
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(a) => a.to_word().to_vec(),
        Token::Bool(b) => usize_word(usize::from(*b)).to_vec(),
        Token::Uint(w) | Token::Int(w) => w.to_vec(),
        Token::FixedBytes(bytes) => padded(bytes),
        Token::Bytes(bytes) => length_prefixed(bytes),
        Token::String(s) => length_prefixed(s.as_bytes()),
        Token::Array(items) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend(encode_sequence(items));
            out
        }
        Token::FixedArray(items) | Token::Tuple(items) => encode_sequence(items),
    }
}

fn usize_word(n: usize) -> Word {
    let mut word = [0u8; WORD_LEN];
    let be = (n as u64).to_be_bytes();
    word[WORD_LEN - be.len()..].copy_from_slice(&be);
    word
}

fn padded(bytes: &[u8]) -> Vec<u8> {
    let len = bytes.len().div_ceil(WORD_LEN) * WORD_LEN;
    let mut out = bytes.to_vec();
    out.resize(len, 0);
    out
}

fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = usize_word(bytes.len()).to_vec();
    out.extend(padded(bytes));
    out
}
