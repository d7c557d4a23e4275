// src/core/probes/dns.rs
//
// DNS-based archetype: no HTTP involved, the finding is about the zone
// itself.

use std::net::{IpAddr, SocketAddr};

use hickory_client::client::{AsyncClient, ClientHandle};
use hickory_client::proto::iocompat::AsyncIoTokioAsStd;
use hickory_client::rr::{DNSClass, Name, RecordType};
use hickory_client::tcp::TcpClientStream;
use hickory_resolver::error::ResolveErrorKind;
use tokio::net::TcpStream;
use tracing::debug;

use crate::core::error::ProbeError;
use crate::core::models::Finding;
use crate::core::registry::{Probe, ProbeScope};
use crate::core::transport::TargetContext;

pub fn axfr() -> std::sync::Arc<dyn Probe> {
    std::sync::Arc::new(Axfr)
}

/// Open zone transfers: any of the domain's nameservers answering AXFR hands
/// out the complete zone, internal hostnames included, to anyone who asks.
struct Axfr;

/// How many of the zone's nameservers to try before giving up.
const MAX_NAMESERVERS: usize = 3;

#[async_trait::async_trait]
impl Probe for Axfr {
    fn name(&self) -> &'static str {
        "axfr"
    }

    fn scope(&self) -> ProbeScope {
        ProbeScope::PerHost
    }

    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
        // Raw addresses have no zone to transfer.
        if ctx.host.parse::<IpAddr>().is_ok() {
            return Ok(None);
        }
        let zone = Name::from_ascii(&ctx.host)
            .map_err(|e| ProbeError::Dns(format!("bad zone name {}: {e}", ctx.host)))?;

        let nameservers = match ctx.resolver.ns_lookup(zone.clone()).await {
            Ok(lookup) => lookup,
            // No NS records (e.g. a subdomain) is a perfectly normal answer.
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        for ns in nameservers.iter().take(MAX_NAMESERVERS) {
            let ns_host = ns.0.to_utf8();
            let addresses = match ctx.resolver.lookup_ip(ns_host.as_str()).await {
                Ok(addresses) => addresses,
                Err(e) => {
                    debug!(nameserver = %ns_host, error = %e, "nameserver did not resolve");
                    continue;
                }
            };
            let Some(ip) = addresses.iter().next() else {
                continue;
            };
            match transfer_zone(ip, &zone).await {
                Ok(records) if records > 1 => {
                    return Ok(Some(Finding::new(self.name(), &ctx.host).with_detail(
                        format!("{ns_host} answered a zone transfer with {records} records"),
                    )));
                }
                Ok(records) => {
                    debug!(nameserver = %ns_host, records, "transfer refused or empty");
                }
                Err(e) => {
                    debug!(nameserver = %ns_host, error = %e, "axfr attempt failed");
                }
            }
        }
        Ok(None)
    }
}

/// One AXFR query over TCP against a single nameserver. Returns the record
/// count of the answer; a refusing server yields an error or an answer too
/// short to be a zone.
async fn transfer_zone(ip: IpAddr, zone: &Name) -> Result<usize, ProbeError> {
    let address = SocketAddr::new(ip, 53);
    let (stream, sender) = TcpClientStream::<AsyncIoTokioAsStd<TcpStream>>::new(address);
    let (mut client, background) = AsyncClient::new(stream, sender, None)
        .await
        .map_err(|e| ProbeError::Dns(e.to_string()))?;
    let background = tokio::spawn(background);

    let result = client
        .query(zone.clone(), DNSClass::IN, RecordType::AXFR)
        .await
        .map_err(|e| ProbeError::Dns(e.to_string()));
    background.abort();

    Ok(result?.answers().len())
}
