use thiserror::Error;

/// Erreurs de l'encodeur ABI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Type ABI non reconnu.
    #[error("invalid type: `{0}`")]
    InvalidType(String),

    /// Adresse mal formée (longueur ou hex).
    #[error("invalid address: `{0}`")]
    InvalidAddress(String),

    /// Chaîne hex invalide.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Signature de fonction illisible.
    #[error("invalid signature: `{0}`")]
    InvalidSignature(String),

    /// Le token ne correspond pas au type déclaré.
    #[error("cannot encode {found} as {expected}")]
    TypeMismatch {
        /// Type ABI attendu (forme canonique).
        expected: String,
        /// Nature du token reçu.
        found: String,
    },

    /// Valeur hors de la plage du type déclaré.
    #[error("value out of range for {0}")]
    OutOfRange(String),
}

/// Résultat de l'encodeur ABI.
pub type AbiResult<T> = Result<T, AbiError>;
