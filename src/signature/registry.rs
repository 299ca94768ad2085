//! Curated registry of well-known contract functions.
//!
//! Entries are keyed by signature text. Almost every key is the entry's own
//! canonical signature; the only exceptions are the annotated `transfer` keys in
//! [`ANNOTATED_TRANSFER_KEYS`], which tell an ERC20 amount transfer apart from
//! an ERC721 token transfer that shares the same selector.
//!
//! The registry is built and validated once. Call [`validate`] during startup to
//! surface an inconsistent registry as an error; otherwise the first lookup
//! through [`global`] builds it and panics on inconsistency.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::{canonical_signature, EffectMask, FunctionParam, ParsedSignature};
use crate::abi;

/// Registry keys allowed to differ from their entry's canonical signature.
pub const ANNOTATED_TRANSFER_KEYS: [&str; 3] = [
    "transfer(address to, uint256 tokenID)",
    "transfer(address to, uint256 value)",
    "transfer(address to, uint256 amount)",
];

/// Roles that get a generated set of access-control functions.
pub const WELL_KNOWN_ROLES: [&str; 14] = [
    "admin",
    "minter",
    "pauser",
    "burner",
    "signer",
    "whitelisted",
    "blacklisted",
    "owner",
    "operator",
    "verifier",
    "legal",
    "legalOperator",
    "legalHolder",
    "legalHoldOperator",
];

/// Registry integrity errors, detected while building the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two entries share a key
    #[error("Duplicate function description: {0}")]
    DuplicateKey(String),

    /// A key is neither canonical nor an allowed annotated key
    #[error("Signature mismatch: key {key} != canonical {canonical}")]
    SignatureMismatch {
        /// Registry key
        key: String,
        /// Canonical signature of the entry
        canonical: String,
    },
}

/// A curated function entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownFunction {
    key: String,
    name: String,
    description: String,
    inputs: Vec<FunctionParam>,
    outputs: Vec<FunctionParam>,
    effects: EffectMask,
    selector: [u8; 4],
}

impl WellKnownFunction {
    /// Create an entry; the selector is computed from the canonical signature.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        inputs: Vec<FunctionParam>,
        outputs: Vec<FunctionParam>,
        effects: EffectMask,
    ) -> Self {
        let name = name.into();
        let selector = abi::selector_of(&canonical_signature(&name, &inputs));
        Self {
            key: key.into(),
            name,
            description: description.into(),
            inputs,
            outputs,
            effects,
            selector,
        }
    }

    /// Registry key this entry is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Named input parameters
    pub fn inputs(&self) -> &[FunctionParam] {
        &self.inputs
    }

    /// Named output parameters
    pub fn outputs(&self) -> &[FunctionParam] {
        &self.outputs
    }

    /// Known effects
    pub fn effects(&self) -> EffectMask {
        self.effects
    }

    /// Precomputed selector
    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// `name(type,type,...)`
    pub fn canonical(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }
}

/// Lookup tables over the curated entries.
#[derive(Debug, Default)]
pub struct Registry {
    by_key: HashMap<String, Arc<WellKnownFunction>>,
    by_selector: HashMap<[u8; 4], Arc<WellKnownFunction>>,
}

impl Registry {
    /// Build the registry from the built-in entries and validate it.
    pub fn build() -> Result<Self, RegistryError> {
        Self::from_entries(builtin_entries())
    }

    /// Build a registry from arbitrary entries, applying the same validation.
    pub fn from_entries<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = WellKnownFunction>,
    {
        let mut registry = Registry::default();
        for entry in entries {
            registry.insert(entry)?;
        }
        log::debug!("Well-known registry built with {} entries", registry.len());
        Ok(registry)
    }

    fn insert(&mut self, entry: WellKnownFunction) -> Result<(), RegistryError> {
        if self.by_key.contains_key(entry.key()) {
            return Err(RegistryError::DuplicateKey(entry.key().to_string()));
        }

        let canonical = entry.canonical();
        let entry = Arc::new(entry);
        if entry.key() == canonical {
            // only canonical entries are reachable by selector
            self.by_selector.insert(entry.selector(), Arc::clone(&entry));
        } else if !ANNOTATED_TRANSFER_KEYS.contains(&entry.key()) {
            return Err(RegistryError::SignatureMismatch {
                key: entry.key().to_string(),
                canonical,
            });
        }

        self.by_key.insert(entry.key().to_string(), entry);
        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true if the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Entry stored under exactly `key` (surrounding whitespace ignored)
    pub fn get(&self, key: &str) -> Option<&Arc<WellKnownFunction>> {
        self.by_key.get(key.trim())
    }

    /// Entry whose canonical signature hashes to `selector`
    pub fn by_selector(&self, selector: [u8; 4]) -> Option<&Arc<WellKnownFunction>> {
        self.by_selector.get(&selector)
    }

    /// Entries whose name matches `name`, ignoring case, ordered by key
    pub fn by_name(&self, name: &str) -> Vec<&Arc<WellKnownFunction>> {
        let mut found: Vec<_> = self
            .by_key
            .values()
            .filter(|entry| entry.name().eq_ignore_ascii_case(name))
            .collect();
        found.sort_by(|a, b| a.key().cmp(b.key()));
        found
    }

    /// Find the entry for a parsed signature.
    ///
    /// Tries the raw text, the canonical form, the whitespace-collapsed
    /// canonical and raw forms, then the lower-cased bare name.
    pub fn lookup(&self, sig: &ParsedSignature) -> Option<Arc<WellKnownFunction>> {
        let canonical = sig.canonical();
        let collapsed = collapse_whitespace(&canonical);
        let candidates = [
            sig.raw.clone(),
            canonical,
            collapsed,
            collapse_whitespace(&sig.raw),
            sig.name.to_lowercase(),
        ];

        candidates
            .iter()
            .find_map(|key| self.get(key))
            .map(Arc::clone)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Build and install the process-wide registry, reporting integrity errors.
pub fn validate() -> Result<&'static Registry, RegistryError> {
    if let Some(registry) = REGISTRY.get() {
        return Ok(registry);
    }
    let registry = Registry::build()?;
    Ok(REGISTRY.get_or_init(|| registry))
}

/// The process-wide registry.
///
/// # Panics
/// Panics if the built-in entries are inconsistent; the registry is a startup
/// precondition, not a runtime input.
pub fn global() -> &'static Registry {
    REGISTRY.get_or_init(|| match Registry::build() {
        Ok(registry) => registry,
        Err(err) => panic!("well-known function registry is inconsistent: {err}"),
    })
}

/// Static description of one entry: key, name, description, inputs, outputs, effects.
type EntryRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str)],
    &'static [(&'static str, &'static str)],
    EffectMask,
);

const NONE: &[(&str, &str)] = &[];

const ENTRIES: &[EntryRow] = &[
    ("balance(address)", "balance", "get the balance of the given account",
        &[("address", "accountAddress")], &[("uint256", "balance")], EffectMask::READ),
    ("mint(address,uint256)", "mint", "mint new tokens",
        &[("address", "receiverAddress"), ("uint256", "amount")], NONE, EffectMask::MINT),
    ("burn(uint256)", "burn", "burn tokens",
        &[("uint256", "amount")], NONE, EffectMask::BURN),
    ("burn(address,uint256)", "burn", "burn tokens",
        &[("address", "accountAddress"), ("uint256", "amount")], NONE, EffectMask::empty()),
    ("transfer(address,uint256)", "transfer", "transfer erc20 tokens or a specific erc721 to the given address",
        &[("address", "to"), ("uint256", "amount")], NONE, EffectMask::TRANSFER),
    ("transfer(address to, uint256 tokenID)", "transfer", "transfer a specific erc721 to the given address",
        &[("address", "to"), ("uint256", "tokenID")], NONE, EffectMask::TRANSFER),
    ("transfer(address to, uint256 value)", "transfer", "transfer erc20 tokens to the given address",
        &[("address", "to"), ("uint256", "value")], NONE, EffectMask::TRANSFER),
    ("transfer(address to, uint256 amount)", "transfer", "transfer erc20 tokens to the given address",
        &[("address", "to"), ("uint256", "amount")], NONE, EffectMask::TRANSFER),
    ("transferFrom(address,address,uint256)", "transferFrom", "transfer tokens from the given address to the given address",
        &[("address", "from"), ("address", "to"), ("uint256", "amount")], NONE, EffectMask::TRANSFER),
    ("approve(address,uint256)", "approve", "approve the given address to spend the specified number of tokens on behalf of the message sender",
        &[("address", "spender"), ("uint256", "amount")], NONE, EffectMask::STATE_WRITE),
    ("name()", "name", "get the name of the token",
        NONE, &[("string", "name")], EffectMask::READ),
    ("owner()", "owner", "get the owner of the contract",
        NONE, &[("address", "owner")], EffectMask::READ),
    ("symbol()", "symbol", "get the symbol of the token",
        NONE, &[("string", "symbol")], EffectMask::READ),
    ("totalSupply()", "totalSupply", "get the total supply of the token",
        NONE, &[("uint256", "totalSupply")], EffectMask::READ),
    ("decimals()", "decimals", "get the number of decimals of the token",
        NONE, &[("uint8", "decimals")], EffectMask::READ),
    ("balanceOf(address)", "balanceOf", "get the balance of the given address",
        &[("address", "accountAddress")], &[("uint256", "balance")], EffectMask::READ),
    ("allowance(address,address)", "allowance", "get the number of tokens that the given address is allowed to spend on behalf of the given address",
        &[("address", "owner"), ("address", "spender")], &[("uint256", "allowance")], EffectMask::READ),
    ("renounceOwnership()", "renounceOwnership", "renounce ownership of the contract",
        NONE, NONE, EffectMask::STATE_WRITE),
    ("transferOwnership(address)", "transferOwnership", "transfer ownership of the contract to the given address",
        &[("address", "newOwner")], NONE, EffectMask::STATE_WRITE),
    ("pause()", "pause", "pause the contract",
        NONE, NONE, EffectMask::STATE_WRITE),
    ("unpause()", "unpause", "unpause the contract",
        NONE, NONE, EffectMask::STATE_WRITE),
    ("paused()", "paused", "check if the contract is paused",
        NONE, &[("bool", "paused")], EffectMask::READ),
    ("ownerOf(uint256)", "ownerOf", "get the owner of the given token",
        &[("uint256", "tokenId")], &[("address", "owner")], EffectMask::READ),
    ("getApproved(uint256)", "getApproved", "get the approved address for the given token",
        &[("uint256", "tokenId")], &[("address", "operator")], EffectMask::READ),
    ("setApprovalForAll(address,bool)", "setApprovalForAll", "set the approval status for the given operator",
        &[("address", "operator"), ("bool", "approved")], NONE, EffectMask::STATE_WRITE),
    ("isApprovedForAll(address,address)", "isApprovedForAll", "check if the given operator is approved for the given owner",
        &[("address", "owner"), ("address", "operator")], &[("bool", "approved")], EffectMask::READ),
    ("safeTransferFrom(address,address,uint256)", "safeTransferFrom", "transfer the given token from the given address to the given address",
        &[("address", "from"), ("address", "to"), ("uint256", "tokenId")], NONE, EffectMask::TRANSFER),
    ("safeTransferFrom(address,address,uint256,bytes)", "safeTransferFrom", "transfer the given token from the given address to the given address",
        &[("address", "from"), ("address", "to"), ("uint256", "tokenId"), ("bytes", "data")], NONE, EffectMask::TRANSFER),
    ("tokenURI(uint256)", "tokenURI", "get the URI of the given token",
        &[("uint256", "tokenId")], &[("string", "tokenURI")], EffectMask::READ),
    ("supportsInterface(bytes4)", "supportsInterface", "check if the contract implements the given interface",
        &[("bytes4", "interfaceId")], &[("bool", "supported")], EffectMask::READ),
    ("onERC721Received(address,address,uint256,bytes)", "onERC721Received", "handle the receipt of an NFT",
        &[("address", "operator"), ("address", "from"), ("uint256", "tokenId"), ("bytes", "data")], NONE, EffectMask::empty()),
    ("isOnLegalHold(uint256)", "isOnLegalHold", "check if the given token is on legal hold",
        &[("uint256", "tokenId")], &[("bool", "onHold")], EffectMask::READ),
    ("putOnLegalHold(uint256)", "putOnLegalHold", "put the given token on legal hold",
        &[("uint256", "tokenId")], NONE, EffectMask::STATE_WRITE),
    ("releaseLegalHold(uint256)", "releaseLegalHold", "release the given token from legal hold",
        &[("uint256", "tokenId")], NONE, EffectMask::STATE_WRITE),
];

fn params(rows: &[(&str, &str)]) -> Vec<FunctionParam> {
    rows.iter().map(|(ty, name)| FunctionParam::new(*ty, *name)).collect()
}

/// Access-control functions generated for one role.
fn role_entries(role: &str) -> Vec<WellKnownFunction> {
    let mut chars = role.chars();
    let cap = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    let account = || vec![FunctionParam::new("address", "account")];
    let flag = |name: &str| vec![FunctionParam::new("bool", name)];
    let is_name = format!("is{}", cap);

    vec![
        WellKnownFunction::new(
            format!("add{}(address)", cap),
            format!("add{}", cap),
            format!("add the given address to the {} role", role),
            account(),
            Vec::new(),
            EffectMask::ACCESS_CONTROL_UPDATE,
        ),
        WellKnownFunction::new(
            format!("remove{}(address)", cap),
            format!("remove{}", cap),
            format!("remove the given address from the {} role", role),
            account(),
            Vec::new(),
            EffectMask::ACCESS_CONTROL_UPDATE,
        ),
        WellKnownFunction::new(
            format!("renounce{}()", cap),
            format!("renounce{}", cap),
            format!("remove the sender from the {} role", role),
            Vec::new(),
            Vec::new(),
            EffectMask::ACCESS_CONTROL_UPDATE,
        ),
        WellKnownFunction::new(
            format!("has{}Role(address)", cap),
            format!("has{}Role", cap),
            format!("check if the given address has the {} role", role),
            account(),
            flag("hasRole"),
            EffectMask::READ,
        ),
        WellKnownFunction::new(
            format!("{}()", is_name),
            is_name.clone(),
            format!("check if the sender has the {} role", role),
            Vec::new(),
            flag(&is_name),
            EffectMask::READ,
        ),
        WellKnownFunction::new(
            format!("{}(address)", is_name),
            is_name.clone(),
            format!("check if the given address has the {} role", role),
            account(),
            flag(&is_name),
            EffectMask::READ,
        ),
    ]
}

fn builtin_entries() -> impl Iterator<Item = WellKnownFunction> {
    let curated = ENTRIES.iter().map(|(key, name, description, inputs, outputs, effects)| {
        WellKnownFunction::new(*key, *name, *description, params(inputs), params(outputs), *effects)
    });
    let roles = WELL_KNOWN_ROLES.iter().flat_map(|role| role_entries(role));
    curated.chain(roles)
}
