//! Get/set commands - read and write single attributes

use anyhow::Result;
use clap::Args;

use crate::session::Session;

/// Arguments for the get command
#[derive(Args)]
pub struct GetArgs {
    /// Attribute display name
    pub name: String,
}

/// Arguments for the set command
#[derive(Args)]
pub struct SetArgs {
    /// Attribute display name
    pub name: String,

    /// New value, parsed according to the attribute type
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

pub fn get(args: GetArgs, session: &Session) -> Result<()> {
    let value = session.data.try_attribute_value(&session.rover, &args.name)?;
    println!("{value}");
    Ok(())
}

pub fn set(args: SetArgs, session: &mut Session) -> Result<()> {
    let value = session.parse_attribute(&args.name, &args.value)?;
    session
        .data
        .try_set_attribute_value(&mut session.rover, &args.name, value)?;
    session.save()?;

    let current = session.data.try_attribute_value(&session.rover, &args.name)?;
    println!("{} = {}", args.name, current);
    Ok(())
}
