//! This file defines types that handle password validation and hashing.
//! `ValidatedPassword` wraps a string and ensure it is an acceptable password.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{
    Score,
    feedback::{Feedback, Suggestion, Warning},
    zxcvbn,
};

use crate::Error;

/// The fewest characters a password may have.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A password that has been validated, but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password is shorter than
    /// [MIN_PASSWORD_LENGTH] characters or is very easy to guess.
    /// The error message explains why the password was rejected.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        if raw_password_string.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::TooWeak(format!(
                "A senha deve ter pelo menos {MIN_PASSWORD_LENGTH} caracteres."
            )));
        }

        let password_analysis = zxcvbn(raw_password_string, &[]);

        if matches!(password_analysis.score(), Score::Zero | Score::One) {
            return Err(Error::TooWeak(weak_password_message(
                password_analysis.feedback(),
            )));
        }

        Ok(Self(raw_password_string.to_string()))
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password_string` is a valid and secure password.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid password is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_string())
    }
}

/// Explain in Portuguese why a password was rejected as too easy to guess.
fn weak_password_message(feedback: Option<&Feedback>) -> String {
    let mut message = vec!["Senha muito fraca.".to_owned()];

    if let Some(feedback) = feedback {
        message.extend(feedback.warning().map(|warning| warning_text(warning).to_owned()));
        message.extend(
            feedback
                .suggestions()
                .iter()
                .map(|suggestion| suggestion_text(*suggestion).to_owned()),
        );
    }

    if message.len() == 1 {
        message.push("Esta senha é muito fácil de adivinhar.".to_owned());
    }

    message.join(" ")
}

fn warning_text(warning: Warning) -> &'static str {
    match warning {
        Warning::StraightRowsOfKeysAreEasyToGuess => {
            "Sequências de teclas em linha são fáceis de adivinhar."
        }
        Warning::ShortKeyboardPatternsAreEasyToGuess => {
            "Padrões curtos do teclado são fáceis de adivinhar."
        }
        Warning::RepeatsLikeAaaAreEasyToGuess => {
            "Repetições como \"aaa\" são fáceis de adivinhar."
        }
        Warning::RepeatsLikeAbcAbcAreOnlySlightlyHarderToGuess => {
            "Repetições como \"abcabc\" são só um pouco mais difíceis de adivinhar que \"abc\"."
        }
        Warning::ThisIsATop10Password => "Esta é uma das 10 senhas mais usadas.",
        Warning::ThisIsATop100Password => "Esta é uma das 100 senhas mais usadas.",
        Warning::ThisIsACommonPassword => "Esta é uma senha muito comum.",
        Warning::ThisIsSimilarToACommonlyUsedPassword => {
            "Esta senha é parecida com uma senha muito usada."
        }
        Warning::SequencesLikeAbcAreEasyToGuess => {
            "Sequências como \"abc\" ou \"6543\" são fáceis de adivinhar."
        }
        Warning::RecentYearsAreEasyToGuess => "Anos recentes são fáceis de adivinhar.",
        Warning::AWordByItselfIsEasyToGuess => "Uma palavra sozinha é fácil de adivinhar.",
        Warning::DatesAreOftenEasyToGuess => "Datas costumam ser fáceis de adivinhar.",
        Warning::NamesAndSurnamesByThemselvesAreEasyToGuess => {
            "Nomes e sobrenomes sozinhos são fáceis de adivinhar."
        }
        Warning::CommonNamesAndSurnamesAreEasyToGuess => {
            "Nomes e sobrenomes comuns são fáceis de adivinhar."
        }
    }
}

fn suggestion_text(suggestion: Suggestion) -> &'static str {
    match suggestion {
        Suggestion::UseAFewWordsAvoidCommonPhrases => {
            "Use algumas palavras e evite frases comuns."
        }
        Suggestion::NoNeedForSymbolsDigitsOrUppercaseLetters => {
            "Não é preciso usar símbolos, números ou letras maiúsculas."
        }
        Suggestion::AddAnotherWordOrTwo => "Acrescente mais uma ou duas palavras incomuns.",
        Suggestion::CapitalizationDoesntHelpVeryMuch => "Letras maiúsculas não ajudam muito.",
        Suggestion::AllUppercaseIsAlmostAsEasyToGuessAsAllLowercase => {
            "Tudo em maiúsculas é quase tão fácil de adivinhar quanto tudo em minúsculas."
        }
        Suggestion::ReversedWordsArentMuchHarderToGuess => {
            "Palavras invertidas não são muito mais difíceis de adivinhar."
        }
        Suggestion::PredictableSubstitutionsDontHelpVeryMuch => {
            "Trocas previsíveis como \"@\" no lugar de \"a\" não ajudam muito."
        }
        Suggestion::UseALongerKeyboardPatternWithMoreTurns => {
            "Use um padrão de teclado mais longo e com mais mudanças de direção."
        }
        Suggestion::AvoidRepeatedWordsAndCharacters => "Evite palavras e caracteres repetidos.",
        Suggestion::AvoidSequences => "Evite sequências.",
        Suggestion::AvoidRecentYears => "Evite anos recentes.",
        Suggestion::AvoidYearsThatAreAssociatedWithYou => "Evite anos ligados a você.",
        Suggestion::AvoidDatesAndYearsThatAreAssociatedWithYou => {
            "Evite datas e anos ligados a você."
        }
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Try to create a password hash from a raw password string.
    ///
    /// This is a convenience function that removes the need to manually create
    /// the intermediate `ValidatedPassword` type.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        let validated_password = ValidatedPassword::new(raw_password)?;
        PasswordHash::new(validated_password, cost)
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, auth::ValidatedPassword};

    #[test]
    fn new_fails_on_empty() {
        let result = ValidatedPassword::new("");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_on_password_under_six_characters() {
        let result = ValidatedPassword::new("aZ9!q");

        assert_eq!(
            result,
            Err(Error::TooWeak(
                "A senha deve ter pelo menos 6 caracteres.".to_owned()
            ))
        );
    }

    #[test]
    fn new_fails_on_common_password() {
        let result = ValidatedPassword::new("password");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn weak_password_is_explained_in_portuguese() {
        let Err(Error::TooWeak(message)) = ValidatedPassword::new("password123") else {
            panic!("password123 should be rejected as too weak");
        };

        assert!(
            message.starts_with("Senha muito fraca."),
            "unexpected message: {message}"
        );
        assert!(
            message.contains("Acrescente mais uma ou duas palavras incomuns."),
            "unexpected message: {message}"
        );
        assert!(!message.contains("common"), "untranslated message: {message}");
    }

    #[test]
    fn new_succeeds_on_long_password() {
        let result = ValidatedPassword::new("asomewhatlongpassword1");

        assert!(result.is_ok());
    }
}
