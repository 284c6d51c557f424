//! Invoke command - call an inspection method

use anyhow::{Context, Result};
use clap::Args;
use simscope_core::inspect::{TypeRef, Value};

use crate::session::Session;

/// Arguments for the invoke command
#[derive(Args)]
pub struct InvokeArgs {
    /// Method display name
    pub name: String,

    /// Positional arguments, parsed according to the method signature
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn execute(args: InvokeArgs, session: &mut Session) -> Result<()> {
    let values = parse_arguments(session, &args)?;
    let result = session
        .data
        .invoke_method(&mut session.rover, &args.name, values)?;
    session.save()?;

    if result != Value::Unit {
        println!("{result}");
    }
    Ok(())
}

fn parse_arguments(session: &Session, args: &InvokeArgs) -> Result<Vec<Value>> {
    // Unknown methods are reported by the invocation itself
    let params = session
        .data
        .method(&args.name)
        .map(|m| m.params().to_vec())
        .unwrap_or_default();

    args.args
        .iter()
        .enumerate()
        .map(|(index, text)| {
            // Surplus arguments are inferred and rejected by the arity check
            let ty = params.get(index).copied().unwrap_or(TypeRef::Any);
            Value::parse(&ty, text).with_context(|| format!("Invalid argument {index}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simscope_core::config::Config;
    use simscope_core::inspect::{CallError, InspectionError};

    fn invoke(session: &mut Session, name: &str, args: &[&str]) -> Result<()> {
        execute(
            InvokeArgs {
                name: name.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
            session,
        )
    }

    #[test]
    fn test_invoke_with_typed_arguments() {
        let mut session = Session::with_config(&Config::default(), None).unwrap();
        invoke(&mut session, "turn", &["-90"]).unwrap();
        assert_eq!(session.rover.chassis.heading, 270);

        invoke(&mut session, "drive", &["2"]).unwrap();
        assert_eq!(session.rover.battery, 98);
    }

    #[test]
    fn test_invoke_errors() {
        let mut session = Session::with_config(&Config::default(), None).unwrap();

        let err = invoke(&mut session, "fly", &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InspectionError>(),
            Some(InspectionError::NoSuchMethod(_))
        ));

        let err = invoke(&mut session, "turn", &["1", "2"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InspectionError>(),
            Some(InspectionError::Invocation {
                source: CallError::Arity { .. },
                ..
            })
        ));

        assert!(invoke(&mut session, "turn", &["left"]).is_err());
    }
}
