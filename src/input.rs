use inquire::validator::{StringValidator, Validation};
use inquire::{error::InquireError, CustomUserError, Text};

type InputResult<T> = Result<T, InquireError>;

pub fn description() -> InputResult<String> {
    Ok(Text::new("Description:")
        .with_help_message("What the invoice is for")
        .with_validator(required("A description is required"))
        .prompt()?
        .trim()
        .to_string())
}

pub fn client_email() -> InputResult<String> {
    Ok(Text::new("Client email:")
        .with_help_message("The invoice will be sent to this address")
        .with_validator(
            |input: &str| -> Result<Validation, CustomUserError> {
                Ok(if input.trim().contains('@') {
                    Validation::Valid
                } else {
                    Validation::Invalid("Please type a valid email".into())
                })
            },
        )
        .prompt()?
        .trim()
        .to_string())
}

fn required(message: &'static str) -> impl StringValidator {
    move |input: &str| -> Result<Validation, CustomUserError> {
        Ok(if input.trim().is_empty() {
            Validation::Invalid(message.into())
        } else {
            Validation::Valid
        })
    }
}
