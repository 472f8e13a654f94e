//! Contract call executor
//!
//! Validates a caller-supplied call description, ABI-encodes it and hands it
//! to the relay. Validation always runs before any encoding or network
//! traffic; there is no way to skip it.

use super::{RelayService, SponsoredCallRequest, TaskId};
use crate::config::Network;
use crate::{Error, Result};
use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, Bytes};
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;
use std::sync::LazyLock;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid address pattern"));

/// A contract call as described by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    /// JSON ABI array of the target contract
    pub abi: Value,
    pub function_name: String,
    /// Arguments as JSON values, coerced to the ABI's parameter types
    pub args: Vec<Value>,
    pub target: String,
    pub chain: Network,
}

/// Check the call shape; returns the parsed target on success
pub fn validate_call(call: &ContractCall) -> Result<Address> {
    match call.abi.as_array() {
        Some(items) if !items.is_empty() => {}
        Some(_) => return Err(Error::Validation("Invalid ABI: Must not be empty".to_string())),
        None => return Err(Error::Validation("Invalid ABI: Must be an array".to_string())),
    }
    if call.function_name.trim().is_empty() {
        return Err(Error::Validation(
            "Invalid function name: Must be a non-empty string".to_string(),
        ));
    }
    if !ADDRESS_RE.is_match(&call.target) {
        return Err(Error::Validation(
            "Invalid target address: Must be a valid Ethereum address".to_string(),
        ));
    }
    Address::from_str(&call.target).map_err(|e| {
        Error::Validation(format!(
            "Invalid target address: Must be a valid Ethereum address ({})",
            e
        ))
    })
}

fn arg_to_text(arg: &Value) -> Result<String> {
    match arg {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Ok(arg.to_string()),
        Value::Null => Err(Error::Abi("null is not a valid argument".to_string())),
    }
}

fn coerce_args(function: &Function, args: &[Value]) -> Result<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty: DynSolType = param
                .resolve()
                .map_err(|e| Error::Abi(format!("parameter '{}': {}", param.name, e)))?;
            let text = arg_to_text(arg)?;
            ty.coerce_str(&text).map_err(|e| {
                Error::Abi(format!(
                    "argument '{}' is not a valid {}: {}",
                    param.name, param.ty, e
                ))
            })
        })
        .collect()
}

/// Encode `function_name(args)` with its selector using `abi`
pub fn encode_function_call(abi: &Value, function_name: &str, args: &[Value]) -> Result<Bytes> {
    let abi: JsonAbi = serde_json::from_value(abi.clone())
        .map_err(|e| Error::Abi(format!("failed to parse ABI: {}", e)))?;

    let overloads = abi
        .function(function_name)
        .ok_or_else(|| Error::Abi(format!("function '{}' not found in ABI", function_name)))?;
    let function = overloads
        .iter()
        .find(|f| f.inputs.len() == args.len())
        .ok_or_else(|| {
            Error::Abi(format!(
                "no overload of '{}' takes {} argument(s)",
                function_name,
                args.len()
            ))
        })?;

    let values = coerce_args(function, args)?;
    let data = function
        .abi_encode_input(&values)
        .map_err(|e| Error::Abi(format!("failed to encode '{}': {}", function_name, e)))?;
    Ok(Bytes::from(data))
}

/// Validates, encodes and relays contract calls
pub struct ContractCallExecutor<R> {
    relay: R,
}

impl<R: RelayService> ContractCallExecutor<R> {
    pub fn new(relay: R) -> Self {
        Self { relay }
    }

    pub async fn execute(&self, call: &ContractCall) -> Result<TaskId> {
        let target = validate_call(call)?;
        let data = encode_function_call(&call.abi, &call.function_name, &call.args)?;

        tracing::info!(
            function = %call.function_name,
            contract = %target,
            chain = %call.chain,
            "Relaying contract call"
        );

        self.relay
            .sponsored_call(&SponsoredCallRequest {
                chain_id: call.chain.chain_id(),
                target,
                data,
            })
            .await
    }
}
