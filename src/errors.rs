//! Unified error type for the catalog.
//!
//! Every repository, auth, and storage operation returns [`Result`]. The UI
//! boundary turns an [`Error`] into a toast with [`Error::user_message`].

use thiserror::Error;

/// Errors returned by every catalog operation.
#[derive(Debug, Error)]
pub enum Error {
    /// No session where one is required
    #[error("No authenticated session")]
    Unauthenticated,

    /// Caller is neither the owner nor an admin
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// What was refused
        message: String,
    },

    /// No `entity` row with this id
    #[error("{entity} not found: {id}")]
    NotFound {
        /// `"property"` or `"account"`
        entity: &'static str,
        /// The id that was looked up
        id: String,
    },

    /// Input rejected before any write
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending input field
        field: &'static str,
        /// pt-BR text shown to the user
        message: String,
    },

    /// A secondary insert failed and the write was rolled back
    #[error("Partial write failure during {stage}: {message}")]
    PartialWriteFailure {
        /// `"features"` or `"images"`
        stage: &'static str,
        /// Underlying database error
        message: String,
    },

    /// Email already registered
    #[error("Account already registered: {email}")]
    DuplicateEmail {
        /// Normalized email that is taken
        email: String,
    },

    /// Unknown email or wrong password
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Image store could not save a file
    #[error("Image upload failed: {message}")]
    UploadFailed {
        /// Detail for logs
        message: String,
    },

    /// Image store could not remove a file
    #[error("Image delete failed: {message}")]
    DeleteFailed {
        /// Detail for logs
        message: String,
    },

    /// Auth provider failure not covered above
    #[error("Provider error: {message}")]
    Provider {
        /// Provider's own message
        message: String,
    },

    /// Unreadable or invalid settings
    #[error("Configuration error: {message}")]
    Config {
        /// Detail for logs
        message: String,
    },

    /// SeaORM error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] on a property id.
    pub fn property_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "property",
            id: id.into(),
        }
    }

    /// Localized (pt-BR) text shown in the toast for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Usuário não autenticado".to_string(),
            Self::Unauthorized { .. } => "Acesso não autorizado".to_string(),
            Self::NotFound {
                entity: "account", ..
            } => "Usuário não encontrado".to_string(),
            Self::NotFound { .. } => "Imóvel não encontrado".to_string(),
            Self::Validation { message, .. } => message.clone(),
            Self::PartialWriteFailure { .. } => "Erro ao salvar imóvel".to_string(),
            Self::DuplicateEmail { .. } => "Este email já está cadastrado".to_string(),
            Self::InvalidCredentials => "Email ou senha inválidos".to_string(),
            Self::UploadFailed { .. } => "Erro ao fazer upload da imagem".to_string(),
            Self::DeleteFailed { .. } => "Erro ao deletar imagem".to_string(),
            Self::Provider { message } => message.clone(),
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                "Erro inesperado, tente novamente".to_string()
            }
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
