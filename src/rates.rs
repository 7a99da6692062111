use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the staking rate table. The engine only consumes
/// `annual_rate_percent`; name and deposit address are shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoInfo {
    pub display_name: String,
    pub deposit_address: String,
    pub annual_rate_percent: f64,
}

/// Static mapping from crypto-kind identifier to its staking terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, CryptoInfo>);

impl RateTable {
    pub fn get(&self, kind: &str) -> Option<&CryptoInfo> {
        self.0.get(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CryptoInfo)> {
        self.0.iter()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        let mut add = |kind: &str, name: &str, address: &str, rate: f64| {
            table.insert(
                kind.to_string(),
                CryptoInfo {
                    display_name: name.to_string(),
                    deposit_address: address.to_string(),
                    annual_rate_percent: rate,
                },
            );
        };

        add(
            "dogs",
            "DOGS (TON)",
            "UQArqoMhUHIsfq9xsATWfZ_zj7nPJTiShe6LSjqbrJFow9rI",
            2.5,
        );
        add(
            "dogecoin",
            "Dogecoin",
            "DDVYeK8MiizfsnzLtigSAWfx6PH24puQze",
            3.2,
        );
        add("trx", "TRX", "TY4o9UKBz32xi8hexbv6XhccqGBqSk8oJ7", 2.8);
        add(
            "matic",
            "MATIC (Polygon)",
            "0x380060e81A820a1691fA58C84ba27c23ed1Eff77",
            3.0,
        );
        add(
            "litecoin",
            "Litecoin",
            "M9NRbJWHaM6Ry7SaG1tjj6qE4XXeYS7mVr",
            2.7,
        );
        add(
            "solana",
            "Solana",
            "CWnduVqeRQrxqhGPNDnHTqHWM1dJLqCnojhMQS8FEUFB",
            3.5,
        );
        add(
            "pepe",
            "PEPE",
            "0x9af5CEd5b30a94794d9C070a78F77b65eb357e12",
            4.0,
        );

        RateTable(table)
    }
}
