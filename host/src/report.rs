use anyhow::Result;
use serde::Serialize;
use spv_proofs::{block_header_hash_hex, ProofBundle};

/// Hex rendering of a proof bundle.
///
/// Transactions, headers, roots and proof elements keep their raw byte
/// order; only the header hash and txids are shown reversed, as explorers do.
#[derive(Debug, Clone, Serialize)]
pub struct ProofReport {
    pub tx: String,
    pub txid: String,
    pub header_hash: String,
    pub tx_index: u64,
    pub tree_depth: u64,
    pub block_header: String,
    pub merkle_root: String,
    pub witness_proof: Vec<String>,
    pub witness_merkle_root: String,
    pub witness_reserved_value: String,
    pub coinbase_tx: String,
    pub coinbase_txid: String,
    pub coinbase_proof: Vec<String>,
}

impl ProofReport {
    pub fn from_bundle(bundle: &ProofBundle) -> Result<Self> {
        let header = bundle.header_bytes()?;
        Ok(ProofReport {
            tx: hex::encode(&bundle.segwit_tx),
            txid: spv_proofs::to_display_hex(&bundle.txid),
            header_hash: block_header_hash_hex(&header)?,
            tx_index: bundle.tx_index,
            tree_depth: bundle.tree_depth,
            block_header: hex::encode(header),
            merkle_root: hex::encode(bundle.merkle_root),
            witness_proof: bundle.segwit_proof.iter().map(hex::encode).collect(),
            witness_merkle_root: hex::encode(bundle.witness_merkle_root),
            witness_reserved_value: hex::encode(bundle.witness_reserved_value),
            coinbase_tx: hex::encode(&bundle.coinbase_tx),
            coinbase_txid: spv_proofs::to_display_hex(&bundle.coinbase_txid),
            coinbase_proof: bundle.coinbase_proof.iter().map(hex::encode).collect(),
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("tx: {}\n", self.tx));
        out.push_str(&format!("header hash: {}\n", self.header_hash));
        out.push_str(&format!("tx-index: {}\n", self.tx_index));
        out.push_str(&format!("tree-depth: {}\n", self.tree_depth));
        out.push_str(&format!("block header: {}\n", self.block_header));

        out.push_str("\nwproof\n");
        push_list(&mut out, &self.witness_proof);
        out.push_str(&format!("witness-merkle-root: {}\n", self.witness_merkle_root));
        out.push_str(&format!("witness-reserved-value: {}\n", self.witness_reserved_value));
        out.push_str(&format!("ctx: {}\n", self.coinbase_tx));

        out.push_str("\ncproof\n");
        push_list(&mut out, &self.coinbase_proof);
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn push_list(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("[]\n");
        return;
    }
    out.push_str("[\n");
    for item in items {
        out.push_str(&format!("  \"{}\",\n", item));
    }
    out.push_str("]\n");
}
