use std::{error::Error, fmt::Display};

use rand_distr::NormalError;

#[derive(Debug)]
pub enum DiceError {
    InvalidArguments(String),
}

impl Display for DiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            DiceError::InvalidArguments(reason) => {
                format!("DiceError::InvalidArguments({})", reason)
            }
        };

        write!(f, "{}", description)?;

        Ok(())
    }
}

impl Error for DiceError {}

impl From<NormalError> for DiceError {
    fn from(err: NormalError) -> Self {
        DiceError::InvalidArguments(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_the_reason() {
        let err = DiceError::InvalidArguments("use more particles".to_string());

        assert_eq!(
            err.to_string(),
            "DiceError::InvalidArguments(use more particles)"
        );
    }
}
