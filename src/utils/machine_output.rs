use crate::error::Result;
use serde::Serialize;

/// Versioned JSON envelope wrapped around every machine-readable report
#[derive(Debug, Serialize)]
pub struct MachineEnvelope<T>
where
    T: Serialize,
{
    pub version: String,
    pub command: String,
    pub ok: bool,
    pub data: T,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl<T> MachineEnvelope<T>
where
    T: Serialize,
{
    pub fn v1(command: &str, data: T, warnings: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            version: "v1".to_string(),
            command: command.to_string(),
            ok: errors.is_empty(),
            data,
            warnings,
            errors,
        }
    }
}

pub fn emit_v1<T>(command: &str, data: T, warnings: Vec<String>, errors: Vec<String>) -> Result<()>
where
    T: Serialize,
{
    let envelope = MachineEnvelope::v1(command, data, warnings, errors);
    let out = serde_json::to_string_pretty(&envelope)?;
    println!("{}", out);
    Ok(())
}
