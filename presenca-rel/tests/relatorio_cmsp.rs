//! End-to-end CMSP report over an in-memory provider
//!
//! Council sessions are all plenary, so every absence is an expected
//! one; dates arrive as epoch seconds and are sometimes missing.

mod common;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use presenca_rel::adapters::{CasaAdapter, CmspAdapter, MENSAGEM_CMSP};
use presenca_rel::models::{Casa, Presenca, VOTO_ERRO};
use presenca_rel::providers::cmsp::{ProjetoCmsp, SessaoCmsp, VereadorCmsp};

use common::CmspFake;

fn sessao(chave: &str, inicio: Option<i64>) -> SessaoCmsp {
    SessaoCmsp {
        chave: chave.to_string(),
        nome: format!("Sessão {}", chave),
        tipo: Some("Ordinária".to_string()),
        inicio,
        fim: None,
        situacao: Some("Realizada".to_string()),
    }
}

fn fixture() -> CmspFake {
    let vereador = VereadorCmsp {
        chave: "2235".to_string(),
        nome: "João Pereira".to_string(),
        partido: Some("XYZ".to_string()),
        url_foto: None,
    };

    let mut presencas = HashMap::new();
    presencas.insert("c1".to_string(), vec!["JOÃO PEREIRA".to_string()]);
    for chave in ["c2", "c3", "c4"] {
        presencas.insert(chave.to_string(), vec!["Outra Vereadora".to_string()]);
    }

    let projeto = |chave: &str| ProjetoCmsp {
        chave: chave.to_string(),
        tipo: Some("PL".to_string()),
        numero: Some("123".to_string()),
        ano: Some(2018),
        ementa: Some(format!("Ementa do projeto {}", chave)),
        data: Some(1526653800),
        pauta: None,
    };

    CmspFake {
        vereadores: vec![vereador],
        sessoes: vec![
            // 2018-05-14 and 2018-05-16, epoch seconds
            sessao("c1", Some(1526306400)),
            sessao("c2", Some(1526479200)),
            // Session still being keyed in: no date published
            sessao("c3", None),
            sessao("c4", Some(1526479200)),
        ],
        presencas,
        projetos: vec![projeto("p1"), projeto("p2")],
        votos: HashMap::from([("p1".to_string(), "Sim".to_string())]),
        votos_com_falha: HashSet::from(["p2".to_string()]),
    }
}

fn data_final() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 5, 18).unwrap()
}

#[tokio::test]
async fn test_every_absence_is_expected_via_plenary() {
    let adapter = CmspAdapter::new(fixture());

    let relatorio = adapter
        .obter_relatorio("2235", data_final(), 7)
        .await
        .unwrap();

    assert_eq!(relatorio.parlamentar.cargo, Casa::Cmsp);
    assert_eq!(relatorio.mensagem.as_deref(), Some(MENSAGEM_CMSP));

    assert_eq!(relatorio.eventos_presentes.len(), 1);
    assert_eq!(relatorio.eventos_ausentes.len(), 3);
    assert_eq!(relatorio.eventos_ausentes_esperados_total, 3);
    for ausente in &relatorio.eventos_ausentes {
        assert_eq!(ausente.presenca, Some(Presenca::AusenciaEsperada));
    }

    let json = serde_json::to_value(&relatorio).unwrap();
    assert_eq!(json["presencaTotal"], "33.33%");
    assert_eq!(json["presencaRelativa"], "33.33%");
}

#[tokio::test]
async fn test_undated_session_still_counts() {
    let adapter = CmspAdapter::new(fixture());

    let relatorio = adapter
        .obter_relatorio("2235", data_final(), 7)
        .await
        .unwrap();

    let c3 = relatorio
        .eventos_ausentes
        .iter()
        .find(|e| e.id == "c3")
        .unwrap();
    assert!(c3.data_inicial.is_none());
}

#[tokio::test]
async fn test_failed_vote_lookup_yields_sentinel() {
    let adapter = CmspAdapter::new(fixture());

    let relatorio = adapter
        .obter_relatorio("2235", data_final(), 7)
        .await
        .unwrap();

    assert_eq!(relatorio.proposicoes.len(), 2);
    let p1 = relatorio.proposicoes.iter().find(|p| p.id == "p1").unwrap();
    let p2 = relatorio.proposicoes.iter().find(|p| p.id == "p2").unwrap();
    assert_eq!(p1.voto.as_deref(), Some("Sim"));
    assert_eq!(p2.voto.as_deref(), Some(VOTO_ERRO));
    assert_eq!(p1.numero, "123/2018");
}
