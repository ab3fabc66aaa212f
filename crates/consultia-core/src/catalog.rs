//! Static catalog of expert personas.

use crate::category::Category;
use crate::error::CoreError;
use crate::expert::ExpertContext;

/// An expert available for consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expert {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: &'static str,
    pub category: Category,
}

impl Expert {
    const fn new(
        id: &'static str,
        name: &'static str,
        specialty: &'static str,
        category: Category,
    ) -> Self {
        Self {
            id,
            name,
            specialty,
            category,
        }
    }

    /// Persona descriptor sent to the relay.
    pub fn context(&self) -> ExpertContext {
        ExpertContext::new(self.name, self.specialty).with_category(self.category.as_str())
    }
}

use Category::*;

/// Every expert, grouped by category in display order.
pub static EXPERTS: &[Expert] = &[
    Expert::new("andre-prospeccao", "André", "Especialista em prospecção B2B", Vendas),
    Expert::new("carla-roteiros", "Carla", "Criadora de roteiros de vendas consultivas", Vendas),
    Expert::new("joao-crm", "João", "Estrategista de CRM e follow-up", Vendas),
    Expert::new("luciana-negociacao", "Luciana", "Especialista em negociação e fechamento", Vendas),
    Expert::new("pedro-upsell", "Pedro", "Treinador em técnicas de upsell e cross-sell", Vendas),
    Expert::new("fernanda-funil", "Fernanda", "Especialista em funil de vendas digitais", Marketing),
    Expert::new("rafael-anuncios", "Rafael", "Criador de estratégias de anúncios pagos", Marketing),
    Expert::new("bianca-social", "Bianca", "Especialista em redes sociais e engajamento", Marketing),
    Expert::new("lucas-email", "Lucas", "Criador de campanhas de e-mail marketing", Marketing),
    Expert::new("marcos-formacao", "Marcos", "Especialista em formação de pessoas", Pessoas),
    Expert::new("carlos-vagas", "Carlos", "Criador de anúncios de vagas", Pessoas),
    Expert::new("marcelo-cargos", "Marcelo", "Criador de descrição de cargos", Pessoas),
    Expert::new("joana-cultural", "Joana", "Especialista em reset cultural", Pessoas),
    Expert::new("maria-feedbacks", "Maria", "Especialista em feedbacks", Pessoas),
    Expert::new("roberto-mapeamento", "Roberto", "Especialista em mapeamento de processos", Processos),
    Expert::new("juliana-melhoria", "Juliana", "Especialista em melhoria contínua (Lean/Kaizen)", Processos),
    Expert::new("fabio-automacao", "Fábio", "Consultor em automação e produtividade", Processos),
    Expert::new("paula-qualidade", "Paula", "Especialista em gestão da qualidade (ISO)", Processos),
    Expert::new("sergio-ageis", "Sérgio", "Estrategista em metodologias ágeis (Scrum/Kanban)", Processos),
    Expert::new("ricardo-planejamento", "Ricardo", "Consultor em planejamento financeiro empresarial", Financas),
    Expert::new("camila-fluxo", "Camila", "Especialista em fluxo de caixa e capital de giro", Financas),
    Expert::new("henrique-custos", "Henrique", "Analista de custos e precificação", Financas),
    Expert::new("patricia-orcamento", "Patrícia", "Consultora em controle orçamentário", Financas),
    Expert::new("daniel-indicadores", "Daniel", "Especialista em indicadores financeiros e relatórios gerenciais", Financas),
    Expert::new("eduardo-planejamento", "Eduardo", "Especialista em planejamento estratégico", Estrategia),
    Expert::new("natalia-mercado", "Natália", "Estrategista em análise de mercado e concorrência", Estrategia),
    Expert::new("gustavo-inovacao", "Gustavo", "Mentor em inovação e transformação digital", Estrategia),
    Expert::new("isabela-governanca", "Isabela", "Consultora em governança corporativa", Estrategia),
    Expert::new("thiago-okrs", "Thiago", "Especialista em OKRs e metas empresariais", Estrategia),
];

/// Look up an expert by id.
pub fn find(id: &str) -> Result<&'static Expert, CoreError> {
    EXPERTS
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| CoreError::ExpertNotFound(id.to_string()))
}

/// Experts in a single category.
pub fn by_category(category: Category) -> impl Iterator<Item = &'static Expert> {
    EXPERTS.iter().filter(move |e| e.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = EXPERTS.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), EXPERTS.len());
    }

    #[test]
    fn test_every_category_has_experts() {
        for category in Category::ALL {
            assert!(by_category(category).count() > 0, "{category} is empty");
        }
    }

    #[test]
    fn test_find_builds_context() {
        let expert = find("camila-fluxo").unwrap();
        let ctx = expert.context();
        assert_eq!(ctx.name, "Camila");
        assert_eq!(ctx.category.as_deref(), Some("financas"));

        assert!(matches!(find("nobody"), Err(CoreError::ExpertNotFound(_))));
    }
}
