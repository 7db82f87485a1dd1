use chainplan_abi::AbiError;
use thiserror::Error;

/// Erreurs de liaison et de construction d'appels.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Nombre d'arguments différent du nombre d'entrées déclarées.
    #[error("`{function}` expects {expected} arguments, got {got}")]
    Arity {
        /// Signature canonique.
        function: String,
        /// Entrées déclarées.
        expected: usize,
        /// Arguments fournis.
        got: usize,
    },

    /// Argument symbolique dont le type déclaré diffère du paramètre.
    #[error("`{function}` argument {index}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Signature canonique.
        function: String,
        /// Position de l'argument.
        index: usize,
        /// Type du paramètre.
        expected: String,
        /// Type de la valeur fournie.
        found: String,
    },

    /// Argument concret impossible à encoder dans le type du paramètre.
    #[error("`{function}` argument {index}: {source}")]
    InvalidArgument {
        /// Signature canonique.
        function: String,
        /// Position de l'argument.
        index: usize,
        /// Erreur de l'encodeur.
        source: AbiError,
    },

    /// Deux fonctions de l'interface partagent la même signature.
    #[error("duplicate function signature `{0}`")]
    DuplicateSignature(String),

    /// Nom ou signature absent de l'interface.
    #[error("no function `{0}` in interface")]
    UnknownFunction(String),

    /// Nom nu d'une fonction surchargée.
    #[error("`{name}` is overloaded, use a full signature: {}", candidates.join(", "))]
    AmbiguousName {
        /// Nom demandé.
        name: String,
        /// Signatures disponibles.
        candidates: Vec<String>,
    },

    /// Description d'interface mal formée.
    #[error("invalid interface: {0}")]
    InvalidInterface(String),

    /// Erreur ABI (type ou signature illisible).
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// JSON illisible.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Résultat de la liaison de contrats.
pub type ContractResult<T> = Result<T, ContractError>;
