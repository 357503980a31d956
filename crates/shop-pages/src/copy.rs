//! User-facing strings.

use shop_commerce::Locale;

/// Page copy for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCopy {
    pub buy_now: &'static str,
    pub buying: &'static str,
    pub unavailable: &'static str,
    pub checkout_failed: &'static str,
    pub empty_catalog: &'static str,
    pub loading: &'static str,
    pub not_found_title: &'static str,
    pub not_found_body: &'static str,
    pub error_title: &'static str,
    pub error_body: &'static str,
    pub back_home: &'static str,
}

const PT_BR: PageCopy = PageCopy {
    buy_now: "Comprar agora",
    buying: "Redirecionando...",
    unavailable: "Indisponível",
    checkout_failed: shop_commerce::checkout::DEFAULT_FAILURE_MESSAGE,
    empty_catalog: "Nenhum produto disponível no momento.",
    loading: "Carregando produto...",
    not_found_title: "Produto não encontrado",
    not_found_body: "O produto que você procura não existe ou não está mais disponível.",
    error_title: "Algo deu errado",
    error_body: "Não foi possível carregar esta página. Tente novamente em instantes.",
    back_home: "Voltar para a loja",
};

const EN_US: PageCopy = PageCopy {
    buy_now: "Buy now",
    buying: "Redirecting...",
    unavailable: "Unavailable",
    checkout_failed: "Could not redirect to checkout. Please try again.",
    empty_catalog: "No products available right now.",
    loading: "Loading product...",
    not_found_title: "Product not found",
    not_found_body: "The product you are looking for does not exist or is no longer available.",
    error_title: "Something went wrong",
    error_body: "This page could not be loaded. Please try again shortly.",
    back_home: "Back to the store",
};

impl PageCopy {
    /// Copy for `locale`.
    pub fn for_locale(locale: Locale) -> &'static PageCopy {
        match locale {
            Locale::PtBr => &PT_BR,
            Locale::EnUs => &EN_US,
        }
    }
}
