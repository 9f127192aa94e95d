use crate::conf::ConfigError;
use crate::conf::types::ServerConfig;
use crate::runtime::Port;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const WILDCARD_HOST: &str = "*";

/// Hosts bound per port.
pub type PortHosts = BTreeMap<Port, BTreeSet<String>>;

/// Splits `host[:port]`. A missing or `*` port is `default_port`; any other
/// port must be 1 to 5 digits without a leading zero.
pub fn split_wildcard_host_port(host: &str, default_port: u16) -> Result<(String, Port), ConfigError> {
    if !host.contains(':') {
        return Ok((host.to_ascii_lowercase(), Port(default_port)));
    }

    let (name, port) = split_host_port(host)?;
    if port.is_empty() || port == WILDCARD_HOST {
        return Ok((name.to_ascii_lowercase(), Port(default_port)));
    }

    let invalid = || ConfigError::InvalidPort {
        host: host.to_string(),
        port: port.to_string(),
    };

    if !is_port_number(port) {
        return Err(invalid());
    }
    let port = port.parse::<u16>().map_err(|_| invalid())?;

    Ok((name.to_ascii_lowercase(), Port(port)))
}

fn split_host_port(host: &str) -> Result<(&str, &str), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidHost {
        host: host.to_string(),
        reason: reason.to_string(),
    };

    if let Some(rest) = host.strip_prefix('[') {
        let (name, tail) = rest
            .split_once(']')
            .ok_or_else(|| invalid("missing ']' in address"))?;
        let port = tail
            .strip_prefix(':')
            .ok_or_else(|| invalid("missing port in address"))?;
        return Ok((name, port));
    }

    let (name, port) = host
        .rsplit_once(':')
        .ok_or_else(|| invalid("missing port in address"))?;
    if name.contains(':') {
        return Err(invalid("too many colons in address"));
    }
    if name.is_empty() {
        return Err(invalid("missing host in address"));
    }
    Ok((name, port))
}

fn is_port_number(port: &str) -> bool {
    (1..=5).contains(&port.len())
        && port.bytes().all(|b| b.is_ascii_digit())
        && !port.starts_with('0')
}

/// Checks that no two servers bind the same host on the same port and
/// returns the hosts bound per port.
///
/// A single server without hosts binds the wildcard host. With more than
/// one server every server has to declare its hosts.
pub fn validate_port_hosts(servers: &[ServerConfig], default_port: u16) -> Result<PortHosts, ConfigError> {
    let mut bound: HashMap<(String, Port), usize> = HashMap::new();
    let mut port_hosts = PortHosts::new();

    for (index, server) in servers.iter().enumerate() {
        if server.hosts.is_empty() && servers.len() > 1 {
            return Err(ConfigError::HostsMandatory {
                origin: server.origin.clone(),
            });
        }

        for host in effective_hosts(&server.hosts) {
            let (name, port) = split_wildcard_host_port(host, default_port)?;

            match bound.get(&(name.clone(), port)) {
                Some(owner) if *owner != index => {
                    return Err(ConfigError::DuplicateHostPort {
                        host: name,
                        port: port.0,
                        origin: server.origin.clone(),
                    });
                }
                Some(_) => continue,
                None => {}
            }

            port_hosts.entry(port).or_default().insert(name.clone());
            bound.insert((name, port), index);
        }
    }

    Ok(port_hosts)
}

/// Configured hosts, or the wildcard host if none are.
pub fn effective_hosts(hosts: &[String]) -> Vec<&str> {
    if hosts.is_empty() {
        vec![WILDCARD_HOST]
    } else {
        hosts.iter().map(String::as_str).collect()
    }
}
