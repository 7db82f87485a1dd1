use thiserror::Error;

/// Erreurs du planificateur.
///
/// Toutes sont des échecs de validation locaux : rien n'est réessayé, l'appelant corrige la
/// séquence de commandes et relance `plan()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Un `Return` désigne une commande absente (ou postérieure) de la séquence.
    #[error("command {command} references the result of command {target}, which does not precede it")]
    DanglingReference {
        /// Commande qui lit la valeur.
        command: usize,
        /// Commande désignée.
        target: usize,
    },

    /// Un `Return` provient d'un autre planificateur.
    #[error("cannot reuse return values across planners")]
    ForeignReturn,

    /// `replace_state` avec une fonction qui ne renvoie pas exactement un `bytes[]`.
    #[error("`{signature}` cannot replace state: expected a single bytes[] output, found ({found})")]
    InvalidStateReplacement {
        /// Signature canonique de l'appel.
        signature: String,
        /// Types de sortie déclarés, séparés par des virgules.
        found: String,
    },

    /// La sortie d'une commande qui remplace l'état est aussi lue par une commande suivante.
    #[error("command {command} replaces state but its return value is used by command {consumer}")]
    ReturnReplaceConflict {
        /// Commande qui remplace l'état.
        command: usize,
        /// Dernière commande qui lit sa sortie.
        consumer: usize,
    },

    /// Plus d'arguments que de cases d'opérandes dans une instruction.
    #[error("command {command} (`{signature}`) takes {count} arguments, at most {max} fit in an instruction")]
    OperandOverflow {
        /// Index de la commande.
        command: usize,
        /// Signature canonique.
        signature: String,
        /// Nombre d'arguments demandés.
        count: usize,
        /// Capacité d'une instruction.
        max: usize,
    },

    /// L'espace d'index de slots (7 bits, sentinelles exclues) est épuisé.
    #[error(
        "{} needs a new slot but all {max} slots are live",
        .command.map_or_else(|| "literal pre-allocation".to_string(), |c| format!("command {c}"))
    )]
    SlotOverflow {
        /// Commande qui demandait le slot, `None` pour les littéraux initiaux.
        command: Option<usize>,
        /// Nombre de slots adressables.
        max: usize,
    },

    /// Programme incohérent (validation structurelle).
    #[error("corrupted program: {0}")]
    Corrupted(String),
}

impl PlanError {
    /// Construit une erreur de programme incohérent.
    pub fn corrupted(msg: impl Into<String>) -> Self { Self::Corrupted(msg.into()) }
}

/// Résultat du planificateur.
pub type PlanResult<T> = Result<T, PlanError>;
