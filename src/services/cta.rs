// SYNOID Shorts CTA Picker
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Opening and closing call-to-action lines, rotated so consecutive runs do
// not repeat the same line.

use crate::cache::HistoryStore;
use crate::error::Result;
use crate::models::ScriptStyle;
use crate::rng::SeededRng;
use std::sync::Arc;
use tracing::debug;

/// History entries consulted when avoiding repeats.
pub const CTA_LOOKBACK: usize = 3;
/// History entries persisted per key.
pub const CTA_CAPACITY: usize = 5;

const CURIOSITY: [&str; 12] = [
    "fica até o final porque a última vai te surpreender",
    "você provavelmente não sabia disso",
    "isso aqui quase ninguém te conta",
    "presta atenção nisso",
    "isso pode mudar como você vê esse tema",
    "espera a última, ela quebra qualquer expectativa",
    "eu duvido que você já tenha ouvido a última",
    "tem uma virada no final que vale cada segundo",
    "isso parece simples, mas guarda uma surpresa no fim",
    "fica comigo 30 segundos e você vai ver diferente",
    "essa sequência vai abrir sua cabeça",
    "se você curte curiosidade real, não pula",
];

const TIPS: [&str; 12] = [
    "fica até o final porque a dica final é a mais prática",
    "se aplicar isso hoje, já sente resultado",
    "anota essas dicas porque funcionam de verdade",
    "essas dicas economizam tempo já no primeiro dia",
    "não pula, a última resolve um erro comum",
    "em menos de 1 minuto você aprende isso",
    "presta atenção que isso vale ouro",
    "você vai querer testar isso hoje",
    "essas dicas são simples e muito eficazes",
    "fica até o fim para pegar o passo mais forte",
    "isso aqui é direto ao ponto",
    "se você quer resultado rápido, continua",
];

const FACTS: [&str; 12] = [
    "fato rápido: isso vai te surpreender",
    "em segundos você vai entender algo incrível",
    "isso é real e pouca gente sabe",
    "segura essa sequência de fatos",
    "o próximo fato já começa quebrando mito",
    "parece mentira, mas é comprovado",
    "fica até o final para o fato mais absurdo",
    "isso é mais comum do que parece",
    "presta atenção nesses dados",
    "esse fato muda totalmente a perspectiva",
    "se curte informação forte, continua",
    "você vai sair daqui sabendo algo raro",
];

const TOP_LIST: [&str; 12] = [
    "hoje é top lista, e o número 1 é surreal",
    "fica até o final para ver o topo do ranking",
    "esse top vai te surpreender do início ao fim",
    "você não imagina quem está no primeiro lugar",
    "esse ranking tem uma virada no final",
    "acompanha a contagem porque melhora a cada posição",
    "já prepara o print desse top",
    "se você gosta de ranking, esse está forte",
    "não sai antes do top 1",
    "esse top está mais polêmico do que parece",
    "contagem regressiva começando agora",
    "espera o final porque o primeiro lugar é inesperado",
];

pub const FINAL_CTAS: [&str; 12] = [
    "curte e segue para mais",
    "compartilha com alguém que vai gostar",
    "salva para ver depois",
    "segue o Aprende Aqui para não perder os próximos",
    "me diz nos comentários qual foi o melhor",
    "manda esse vídeo no grupo",
    "se ajudou, já deixa o like",
    "quer parte 2? comenta aqui",
    "se você chegou até aqui, já segue",
    "compartilha com quem precisa ver isso",
    "salva agora para aplicar depois",
    "segue e ativa as notificações para a próxima",
];

pub fn initial_ctas(style: ScriptStyle) -> &'static [&'static str] {
    match style {
        ScriptStyle::Curiosity => &CURIOSITY,
        ScriptStyle::Tips => &TIPS,
        ScriptStyle::Facts => &FACTS,
        ScriptStyle::TopList => &TOP_LIST,
    }
}

pub struct CtaPicker {
    history: Arc<dyn HistoryStore>,
    rng: SeededRng,
}

impl CtaPicker {
    pub fn new(history: Arc<dyn HistoryStore>, rng: SeededRng) -> Self {
        Self { history, rng }
    }

    /// Opening line for `style`. Disabled variation always yields the first.
    pub fn initial(&self, style: ScriptStyle, enabled: bool) -> Result<String> {
        let candidates = initial_ctas(style);
        if !enabled {
            return Ok(candidates[0].to_string());
        }
        self.pick(candidates, &format!("initial_{}", style))
    }

    pub fn final_line(&self, enabled: bool) -> Result<String> {
        if !enabled {
            return Ok(FINAL_CTAS[0].to_string());
        }
        self.pick(&FINAL_CTAS, "final")
    }

    fn pick(&self, candidates: &[&str], key: &str) -> Result<String> {
        let window = self.history.window(key, CTA_CAPACITY)?;
        let fresh: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|c| !window.contains_recent(c, CTA_LOOKBACK))
            .collect();
        let pool = if fresh.is_empty() { candidates.to_vec() } else { fresh };
        let chosen = pool[self.rng.pick_index(pool.len())].to_string();
        self.history.append(key, &chosen, CTA_CAPACITY)?;
        debug!("[CTA] {} -> '{}'", key, chosen);
        Ok(chosen)
    }
}
