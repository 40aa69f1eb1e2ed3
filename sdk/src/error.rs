use solana_program::{program_error::ProgramError, pubkey::Pubkey};

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("No off-curve address found for seeds under program {program}")]
    DerivationFailed { program: Pubkey },
    #[error("Account data is not an initialized token account: {0}")]
    InvalidTokenAccount(ProgramError),
    #[error("Account data is not an initialized mint: {0}")]
    InvalidMint(ProgramError),
    #[error("Failed to serialize instruction arguments: {0}")]
    Serialization(#[from] std::io::Error),
}
