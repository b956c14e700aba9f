//! Catto is a paid-mint ERC-721 collection. Anyone can mint cats against a
//! fixed per-token price, holders (or their delegates) can burn them, and the
//! contract owner can withdraw the accumulated proceeds.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::{string::String, vec::Vec};

use alloy_primitives::{aliases::B32, uint, Address, U256};
use alloy_sol_types::sol;
use openzeppelin_stylus::{
    access::ownable::{self, IOwnable, Ownable},
    token::erc721::{
        self,
        extensions::{
            enumerable, Erc721Enumerable, Erc721Metadata, IErc721Burnable,
            IErc721Enumerable, IErc721Metadata,
        },
        Erc721, IErc721,
    },
    utils::introspection::erc165::IErc165,
};
use stylus_sdk::{
    abi::Bytes,
    call::{call, Call},
    contract, evm, msg,
    prelude::*,
    storage::StorageU256,
};

/// Price of a single token, in wei (0.01 Ether).
pub const MINT_PRICE: U256 = uint!(10_000_000_000_000_000_U256);

/// Prefix of every token's metadata URI.
pub const BASE_TOKEN_URI: &str = "https://catto.xyz/";

sol! {
    /// Emitted when the contract's accumulated balance is paid out to the
    /// owner.
    ///
    /// * `recipient` - Owner address receiving the funds.
    /// * `amount` - Amount of wei paid out.
    #[derive(Debug)]
    #[allow(missing_docs)]
    event EtherWithdrawn(address indexed recipient, uint256 amount);
}

sol! {
    /// Indicates that the attached value does not cover the mint price for
    /// the requested quantity.
    ///
    /// * `value` - Wei attached to the call.
    /// * `quantity` - Number of tokens requested.
    #[derive(Debug)]
    #[allow(missing_docs)]
    error CattoInsufficientPayment(uint256 value, uint256 quantity);

    /// Indicates that the payout transfer to the owner failed.
    #[derive(Debug)]
    #[allow(missing_docs)]
    error CattoWithdrawalFailed();
}

/// An error that occurred in the [`Catto`] contract.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// Error of the ERC-721 core or one of its extensions.
    Erc721(erc721::Error),
    /// Error of the ownership layer.
    Ownable(ownable::Error),
    /// The attached value does not cover the mint price.
    InsufficientPayment(CattoInsufficientPayment),
    /// The payout transfer to the owner failed.
    WithdrawalFailed(CattoWithdrawalFailed),
}

impl From<stylus_sdk::call::Error> for Error {
    fn from(_: stylus_sdk::call::Error) -> Self {
        Error::WithdrawalFailed(CattoWithdrawalFailed {})
    }
}

/// State of the [`Catto`] contract.
#[entrypoint]
#[storage]
pub struct Catto {
    erc721: Erc721,
    metadata: Erc721Metadata,
    enumerable: Erc721Enumerable,
    ownable: Ownable,
    /// Id of the most recently minted token. Ids start at 1; the zero id is
    /// the "no token" sentinel of the per-owner enumeration.
    last_token_id: StorageU256,
}

#[public]
#[implements(
    IErc721<Error = erc721::Error>,
    IErc721Metadata<Error = erc721::Error>,
    IErc721Enumerable<Error = enumerable::Error>,
    IErc721Burnable<Error = erc721::Error>,
    IOwnable<Error = ownable::Error>,
    IErc165
)]
impl Catto {
    /// Initializes the collection and installs `initial_owner` as the
    /// account entitled to [`Self::withdraw`].
    ///
    /// # Errors
    ///
    /// * [`ownable::Error::InvalidOwner`] - If `initial_owner` is
    ///   [`Address::ZERO`].
    #[constructor]
    pub fn constructor(
        &mut self,
        initial_owner: Address,
    ) -> Result<(), Error> {
        self.metadata
            .constructor(String::from("Catto"), String::from("CTT"));
        Ok(self.ownable.constructor(initial_owner)?)
    }

    /// Mints `quantity` tokens to the caller against the attached payment.
    ///
    /// Requires at least [`MINT_PRICE`] wei per token. A `quantity` of zero
    /// mints nothing and succeeds.
    ///
    /// # Errors
    ///
    /// * [`CattoInsufficientPayment`] - If the attached value is below
    ///   `MINT_PRICE * quantity`.
    ///
    /// # Events
    ///
    /// * [`erc721::Transfer`] - One per minted token.
    #[payable]
    pub fn mint(&mut self, quantity: U256) -> Result<(), Error> {
        let value = msg::value();
        // `value / MINT_PRICE < quantity` is `value < MINT_PRICE * quantity`
        // without the multiplication overflow.
        if value / MINT_PRICE < quantity {
            return Err(CattoInsufficientPayment { value, quantity }.into());
        }

        let to = msg::sender();
        let mut remaining = quantity;
        while remaining > U256::ZERO {
            let token_id = self.last_token_id.get() + U256::ONE;
            self.last_token_id.set(token_id);

            self.erc721._mint(to, token_id)?;
            self.enumerable._add_token_to_all_tokens_enumeration(token_id);
            self.enumerable._add_token_to_owner_enumeration(
                to,
                token_id,
                &self.erc721,
            )?;

            remaining -= U256::ONE;
        }

        Ok(())
    }

    /// Pays the contract's entire balance out to the owner.
    ///
    /// Transfers the full amount, which may be zero.
    ///
    /// # Errors
    ///
    /// * [`ownable::Error::UnauthorizedAccount`] - If called by any account
    ///   other than the owner.
    /// * [`CattoWithdrawalFailed`] - If the value transfer fails.
    ///
    /// # Events
    ///
    /// * [`EtherWithdrawn`].
    pub fn withdraw(&mut self) -> Result<(), Error> {
        self.ownable.only_owner()?;

        let recipient = self.ownable.owner();
        let amount = contract::balance();
        call(Call::new_in(self).value(amount), recipient, &[])?;

        evm::log(EtherWithdrawn { recipient, amount });
        Ok(())
    }
}

impl Catto {
    /// Keeps both enumerations in sync after an ownership change of
    /// `token_id`. Must run after the core transfer, once the balances
    /// already reflect the new owner.
    fn track_transfer(
        &mut self,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), erc721::Error> {
        self.enumerable._remove_token_from_owner_enumeration(
            from,
            token_id,
            &self.erc721,
        )?;
        self.enumerable._add_token_to_owner_enumeration(
            to,
            token_id,
            &self.erc721,
        )?;
        Ok(())
    }
}

#[public]
impl IErc721 for Catto {
    type Error = erc721::Error;

    fn balance_of(&self, owner: Address) -> Result<U256, erc721::Error> {
        self.erc721.balance_of(owner)
    }

    fn owner_of(&self, token_id: U256) -> Result<Address, erc721::Error> {
        self.erc721.owner_of(token_id)
    }

    fn safe_transfer_from(
        &mut self,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), erc721::Error> {
        self.erc721.safe_transfer_from(from, to, token_id)?;
        self.track_transfer(from, to, token_id)
    }

    #[selector(name = "safeTransferFrom")]
    fn safe_transfer_from_with_data(
        &mut self,
        from: Address,
        to: Address,
        token_id: U256,
        data: Bytes,
    ) -> Result<(), erc721::Error> {
        self.erc721.safe_transfer_from_with_data(from, to, token_id, data)?;
        self.track_transfer(from, to, token_id)
    }

    fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), erc721::Error> {
        self.erc721.transfer_from(from, to, token_id)?;
        self.track_transfer(from, to, token_id)
    }

    fn approve(
        &mut self,
        to: Address,
        token_id: U256,
    ) -> Result<(), erc721::Error> {
        self.erc721.approve(to, token_id)
    }

    fn set_approval_for_all(
        &mut self,
        operator: Address,
        approved: bool,
    ) -> Result<(), erc721::Error> {
        self.erc721.set_approval_for_all(operator, approved)
    }

    fn get_approved(&self, token_id: U256) -> Result<Address, erc721::Error> {
        self.erc721.get_approved(token_id)
    }

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.erc721.is_approved_for_all(owner, operator)
    }
}

#[public]
impl IErc721Metadata for Catto {
    type Error = erc721::Error;

    fn name(&self) -> String {
        self.metadata.name()
    }

    fn symbol(&self) -> String {
        self.metadata.symbol()
    }

    /// Returns `"https://catto.xyz/<token_id>.json"`.
    ///
    /// # Errors
    ///
    /// * [`erc721::Error::NonexistentToken`] - If the token was never minted
    ///   or has been burned.
    #[selector(name = "tokenURI")]
    fn token_uri(&self, token_id: U256) -> Result<String, erc721::Error> {
        self.erc721.owner_of(token_id)?;
        Ok(format!("{BASE_TOKEN_URI}{token_id}.json"))
    }
}

#[public]
impl IErc721Enumerable for Catto {
    type Error = enumerable::Error;

    fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, enumerable::Error> {
        self.enumerable.token_of_owner_by_index(owner, index)
    }

    fn total_supply(&self) -> U256 {
        self.enumerable.total_supply()
    }

    fn token_by_index(&self, index: U256) -> Result<U256, enumerable::Error> {
        self.enumerable.token_by_index(index)
    }
}

#[public]
impl IErc721Burnable for Catto {
    type Error = erc721::Error;

    fn burn(&mut self, token_id: U256) -> Result<(), erc721::Error> {
        // The owner must be read before the core burn deletes it. The core
        // checks that the caller is the owner, approved for the token, or an
        // operator of the owner.
        let owner = self.erc721.owner_of(token_id)?;
        self.erc721.burn(token_id)?;

        self.enumerable._remove_token_from_owner_enumeration(
            owner,
            token_id,
            &self.erc721,
        )?;
        self.enumerable._remove_token_from_all_tokens_enumeration(token_id);
        Ok(())
    }
}

#[public]
impl IOwnable for Catto {
    type Error = ownable::Error;

    fn owner(&self) -> Address {
        self.ownable.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), ownable::Error> {
        self.ownable.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), ownable::Error> {
        self.ownable.renounce_ownership()
    }
}

#[public]
impl IErc165 for Catto {
    fn supports_interface(&self, interface_id: B32) -> bool {
        <Self as IErc721>::interface_id() == interface_id
            || <Self as IErc721Metadata>::interface_id() == interface_id
            || <Self as IErc721Enumerable>::interface_id() == interface_id
            || <Self as IErc165>::interface_id() == interface_id
    }
}
