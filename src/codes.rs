//! Static code tables for the provider's bank and card-issuer short codes.
//!
//! The provider identifies banks, securities firms, and card issuers by
//! short codes in its payloads. These lookups are pure and total: an
//! unrecognized code resolves to [`CodeName::Unknown`] carrying the raw
//! code, never an error. The empty string is itself a valid bank code
//! naming the provider's wallet pseudo-bank.

/// Display name resolved from a provider short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeName {
    Known(&'static str),
    Unknown(String),
}

impl CodeName {
    pub fn is_known(&self) -> bool {
        matches!(self, CodeName::Known(_))
    }

    /// The display name, or the raw code when no table entry exists.
    pub fn as_str(&self) -> &str {
        match self {
            CodeName::Known(name) => name,
            CodeName::Unknown(raw) => raw,
        }
    }
}

/// Resolve a bank code (banks, securities firms, and the `""` wallet
/// pseudo-bank) to its display name.
pub fn bank_name(code: &str) -> CodeName {
    let name = match code {
        "" => "토스머니",
        "39" => "경남은행",
        "34" => "광주은행",
        "12" => "단위농협",
        "32" => "부산은행",
        "45" => "새마을금고",
        "64" => "산림조합",
        "88" => "신한은행",
        "48" => "신협",
        "27" => "한국씨티은행",
        "20" => "우리은행",
        "71" => "우체국예금보험",
        "50" => "저축은행중앙회",
        "37" => "전북은행",
        "35" => "제주은행",
        "90" => "카카오뱅크",
        "89" => "케이뱅크",
        "92" => "토스뱅크",
        "81" => "하나은행",
        "54" => "홍콩상하이은행",
        "03" => "IBK기업은행",
        "06" => "KB국민은행",
        "31" => "DGB대구은행",
        "02" => "KDB산업은행",
        "11" => "NH농협은행",
        "23" => "SC제일은행",
        "07" => "Sh수협은행",
        "209" => "유안타증권",
        "218" => "KB증권",
        "230" => "미래에셋증권",
        "238" => "대신증권",
        "240" => "삼성증권",
        "243" => "한국투자증권",
        "247" => "NH투자증권",
        "261" => "교보증권",
        "262" => "하이투자증권",
        "263" => "현대차증권",
        "264" => "키움증권",
        "265" => "이베스트투자증권",
        "266" => "SK증권",
        "267" => "대신저축은행",
        "269" => "한화투자증권",
        "270" => "하나금융투자",
        "278" => "신한금융투자",
        "279" => "DB금융투자",
        "280" => "유진투자증권",
        "287" => "메리츠증권",
        "290" => "부국증권",
        "291" => "신영증권",
        "292" => "케이프투자증권",
        _ => return CodeName::Unknown(code.to_string()),
    };
    CodeName::Known(name)
}

/// Resolve a card issuer code to its display name.
pub fn card_issuer_name(code: &str) -> CodeName {
    let name = match code {
        "3K" => "기업BC",
        "46" => "광주은행",
        "71" => "롯데카드",
        "30" => "KDB산업은행",
        "31" => "BC카드",
        "51" => "삼성카드",
        "38" => "새마을금고",
        "41" => "신한카드",
        "62" => "신협",
        "36" => "씨티카드",
        "33" => "우리BC카드",
        "W1" => "우리카드",
        "37" => "우체국예금보험",
        "39" => "저축은행중앙회",
        "35" => "전북은행",
        "42" => "제주은행",
        "15" => "카카오뱅크",
        "3A" => "케이뱅크",
        "24" => "토스뱅크",
        "21" => "하나카드",
        "61" => "현대카드",
        "11" => "KB국민카드",
        "91" => "NH농협카드",
        "34" => "Sh수협은행",
        "6D" => "다이너스클럽",
        "4M" => "마스터카드",
        "3C" => "유니온페이",
        "7A" => "아메리칸익스프레스",
        "4J" => "JCB",
        "4V" => "비자",
        _ => return CodeName::Unknown(code.to_string()),
    };
    CodeName::Known(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_bank_codes() {
        assert_eq!(bank_name("88"), CodeName::Known("신한은행"));
        assert_eq!(bank_name("92"), CodeName::Known("토스뱅크"));
        assert_eq!(bank_name("243"), CodeName::Known("한국투자증권"));
    }

    #[test]
    fn empty_string_is_the_wallet_pseudo_bank() {
        assert_eq!(bank_name(""), CodeName::Known("토스머니"));
    }

    #[test]
    fn unknown_bank_code_is_idempotent_and_never_panics() {
        let first = bank_name("ZZ");
        let second = bank_name("ZZ");
        assert_eq!(first, second);
        assert_eq!(first, CodeName::Unknown("ZZ".to_string()));
        assert!(!first.is_known());
        assert_eq!(first.as_str(), "ZZ");
    }

    #[test]
    fn resolves_known_issuer_codes() {
        assert_eq!(card_issuer_name("51"), CodeName::Known("삼성카드"));
        assert_eq!(card_issuer_name("11"), CodeName::Known("KB국민카드"));
        assert_eq!(card_issuer_name("4V"), CodeName::Known("비자"));
    }

    #[test]
    fn unknown_issuer_code_degrades_to_unknown() {
        assert_eq!(
            card_issuer_name("99"),
            CodeName::Unknown("99".to_string())
        );
    }
}
