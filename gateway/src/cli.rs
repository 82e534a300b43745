//! # CLI Interface
//!
//! Defines the command-line argument structure for `aerotrust-gateway`
//! using `clap` derive. Two subcommands: `run` and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AeroTrust compliance ledger gateway.
///
/// Fronts a permissioned compliance ledger: clients sign in with X.509
/// membership credentials, and the gateway signs their outgoing
/// transactions with the matching ECDSA P-256 key.
#[derive(Parser, Debug)]
#[command(
    name = "aerotrust-gateway",
    about = "AeroTrust compliance ledger gateway",
    version,
    propagate_version = true
)]
pub struct GatewayCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the gateway binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway service.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the HTTP API.
    #[arg(long, env = "AEROTRUST_API_PORT", default_value_t = aerotrust_protocol::config::DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "AEROTRUST_METRICS_PORT", default_value_t = aerotrust_protocol::config::DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log format: "pretty" or "json".
    #[arg(long, env = "AEROTRUST_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// MSP ID for an identity bootstrapped from disk at startup.
    ///
    /// When all three bootstrap flags are given, the gateway signs in with
    /// the file pair before serving; otherwise it starts unbound and waits
    /// for `POST /wallet_sign_in`.
    #[arg(long, env = "AEROTRUST_BOOTSTRAP_MSP")]
    pub bootstrap_msp: Option<String>,

    /// Path to the bootstrap identity's PEM certificate file.
    #[arg(long, env = "AEROTRUST_BOOTSTRAP_CERT")]
    pub bootstrap_cert: Option<PathBuf>,

    /// Path to the bootstrap identity's PEM PKCS#8 private-key file.
    #[arg(long, env = "AEROTRUST_BOOTSTRAP_KEY")]
    pub bootstrap_key: Option<PathBuf>,

    /// Endpoint of the org1 peer.
    #[arg(long, env = "AEROTRUST_ORG1_PEER", default_value = aerotrust_protocol::config::DEFAULT_ORG1_PEER)]
    pub org1_peer: String,

    /// Path to the org1 TLS CA certificate (PEM).
    #[arg(long, env = "AEROTRUST_ORG1_TLS_CA")]
    pub org1_tls_ca: PathBuf,

    /// Endpoint of the org2 peer.
    #[arg(long, env = "AEROTRUST_ORG2_PEER", default_value = aerotrust_protocol::config::DEFAULT_ORG2_PEER)]
    pub org2_peer: String,

    /// Path to the org2 TLS CA certificate (PEM).
    #[arg(long, env = "AEROTRUST_ORG2_TLS_CA")]
    pub org2_tls_ca: PathBuf,
}

/// A fully specified bootstrap identity: MSP plus certificate/key paths.
#[derive(Debug, Clone)]
pub struct BootstrapIdentity {
    /// MSP the identity belongs to.
    pub msp_id: String,
    /// Path to the PEM certificate.
    pub certificate: PathBuf,
    /// Path to the PEM PKCS#8 private key.
    pub private_key: PathBuf,
}

impl RunArgs {
    /// Resolves the bootstrap flags. All three or none — a partial trio is
    /// a configuration error, not something to guess around.
    pub fn bootstrap(&self) -> Result<Option<BootstrapIdentity>, String> {
        match (
            self.bootstrap_msp.as_ref(),
            self.bootstrap_cert.as_ref(),
            self.bootstrap_key.as_ref(),
        ) {
            (Some(msp_id), Some(certificate), Some(private_key)) => Ok(Some(BootstrapIdentity {
                msp_id: msp_id.clone(),
                certificate: certificate.clone(),
                private_key: private_key.clone(),
            })),
            (None, None, None) => Ok(None),
            _ => Err(
                "bootstrap identity requires --bootstrap-msp, --bootstrap-cert, \
                 and --bootstrap-key together"
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(extra: &[&str]) -> RunArgs {
        let mut argv = vec![
            "aerotrust-gateway",
            "run",
            "--org1-tls-ca",
            "/tmp/ca1.pem",
            "--org2-tls-ca",
            "/tmp/ca2.pem",
        ];
        argv.extend_from_slice(extra);
        match GatewayCli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        GatewayCli::command().debug_assert();
    }

    #[test]
    fn bootstrap_absent_is_none() {
        assert!(parse(&[]).bootstrap().unwrap().is_none());
    }

    #[test]
    fn bootstrap_full_trio_resolves() {
        let args = parse(&[
            "--bootstrap-msp",
            "Org1MSP",
            "--bootstrap-cert",
            "/tmp/cert.pem",
            "--bootstrap-key",
            "/tmp/priv_sk",
        ]);
        let bootstrap = args.bootstrap().unwrap().unwrap();
        assert_eq!(bootstrap.msp_id, "Org1MSP");
    }

    #[test]
    fn bootstrap_partial_trio_is_rejected() {
        let args = parse(&["--bootstrap-msp", "Org1MSP"]);
        assert!(args.bootstrap().is_err());
    }
}
