//! Domain entities for the report engine
//!
//! Every entity here is an embedded snapshot: organs, propositions and
//! events have no lifecycle of their own, they exist only inside the
//! [`Relatorio`] aggregate built for one request.
//!
//! Serialized field names are the Portuguese camelCase wire contract
//! consumed by templates and API responses (`dataInicial`,
//! `presencaRelativa`, ...) and must be preserved exactly.

mod casa;
mod evento;
pub mod formato;
mod orgao;
mod parlamentar;
mod proposicao;
mod relatorio;

pub use casa::Casa;
pub use evento::{Evento, Presenca};
pub use orgao::{Orgao, APELIDO_PLENARIO};
pub use parlamentar::Parlamentar;
pub use proposicao::{Proposicao, VOTO_AUSENTE, VOTO_ERRO};
pub use relatorio::Relatorio;
