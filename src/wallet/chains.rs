/// A chain the wallet tab can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub id: u64,
    pub name: &'static str,
}

pub const BASE: Chain = Chain { id: 8453, name: "Base" };
pub const OPTIMISM: Chain = Chain { id: 10, name: "OP Mainnet" };
pub const DEGEN: Chain = Chain { id: 666_666_666, name: "Degen" };
pub const SEPOLIA: Chain = Chain { id: 11_155_111, name: "Sepolia" };
pub const UNICHAIN: Chain = Chain { id: 130, name: "Unichain" };

/// Switch order. The last entry wraps back to the first.
const CYCLE: [Chain; 5] = [BASE, OPTIMISM, DEGEN, SEPOLIA, UNICHAIN];

/// The chain offered after `current`. Unknown or absent chains go to Base.
pub fn next_chain(current: Option<u64>) -> Chain {
    current
        .and_then(|id| CYCLE.iter().position(|c| c.id == id))
        .map(|pos| CYCLE[(pos + 1) % CYCLE.len()])
        .unwrap_or(BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_cycle() {
        assert_eq!(next_chain(Some(BASE.id)), OPTIMISM);
        assert_eq!(next_chain(Some(OPTIMISM.id)), DEGEN);
        assert_eq!(next_chain(Some(DEGEN.id)), SEPOLIA);
        assert_eq!(next_chain(Some(SEPOLIA.id)), UNICHAIN);
        assert_eq!(next_chain(Some(UNICHAIN.id)), BASE);
    }

    #[test]
    fn test_unknown_chain_goes_to_base() {
        assert_eq!(next_chain(Some(1)), BASE);
        assert_eq!(next_chain(None), BASE);
    }
}
