//! Client-facing response strings.
//!
//! The deployed clients match on these exact strings, so they are kept in
//! one place and reused by every transport.

use crate::proto::Protocol;

pub fn item_registered(id: i64) -> String {
    format!("Item cadastrado com ID: {id}")
}

pub const BID_ACCEPTED: &str = "Lance registrado com sucesso.";
pub const BID_TOO_LOW: &str = "Erro: Lance inferior ao maior lance atual.";
pub const ITEM_NOT_FOUND: &str = "Erro: Item não encontrado.";

pub const INVALID_COMMAND: &str = "Comando inválido.";
pub const INVALID_REGISTRATION: &str = "Formato inválido. Use: tipo;porta";
pub const METHOD_NOT_ALLOWED: &str = "Método não permitido";
pub const INTERNAL_ERROR: &str = "Erro interno do servidor";

pub fn server_registered(protocol: Protocol, port: u16) -> String {
    format!("Servidor {protocol} registrado com sucesso na porta {port}")
}

pub fn no_backend(protocol: Protocol) -> String {
    format!("Erro: Nenhum servidor {protocol} disponível.")
}

pub const TCP_FORWARD_FAILED: &str = "Erro ao comunicar com o servidor interno TCP.";
pub const TCP_FORWARD_TIMEOUT: &str = "Erro: Timeout ao comunicar com o servidor interno TCP.";
pub const UDP_FORWARD_TIMEOUT: &str = "Erro: Timeout ao processar a requisição via UDP.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_backend_names_the_transport() {
        assert_eq!(
            no_backend(Protocol::Tcp),
            "Erro: Nenhum servidor TCP disponível."
        );
        assert_eq!(
            no_backend(Protocol::Http),
            "Erro: Nenhum servidor HTTP disponível."
        );
    }

    #[test]
    fn registration_ack_is_uppercased() {
        assert_eq!(
            server_registered(Protocol::Udp, 8090),
            "Servidor UDP registrado com sucesso na porta 8090"
        );
    }
}
